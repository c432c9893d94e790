use kb_types::Language;

const ZH_CN: &[(&str, &str)] = &[
    ("appName", "智能知识库"),
    ("version", "版本"),
    ("dashboard", "仪表板"),
    ("fileManager", "文件管理"),
    ("search", "搜索"),
    ("chat", "聊天"),
    ("settings", "设置"),
    ("settingsTitle", "设置"),
    ("settingsDescription", "配置您的知识库系统参数和偏好设置"),
    ("interfaceLanguage", "界面语言"),
    ("apiError", "API调用失败"),
    ("documents", "文档总数"),
    ("sessions", "对话会话"),
    ("embeddingModel", "嵌入模型"),
    ("model", "模型"),
    ("healthy", "正常"),
    ("unavailable", "不可用"),
    ("sources", "参考资料"),
    ("save", "保存"),
    ("cancel", "取消"),
    ("loading", "加载中..."),
    ("error", "错误"),
    ("success", "成功"),
];

const EN: &[(&str, &str)] = &[
    ("appName", "Smart Knowledge Base"),
    ("version", "Version"),
    ("dashboard", "Dashboard"),
    ("fileManager", "File Manager"),
    ("search", "Search"),
    ("chat", "Chat"),
    ("settings", "Settings"),
    ("settingsTitle", "Settings"),
    (
        "settingsDescription",
        "Configure your knowledge base system parameters and preferences",
    ),
    ("interfaceLanguage", "Interface Language"),
    ("apiError", "API call failed"),
    ("documents", "Documents"),
    ("sessions", "Chat sessions"),
    ("embeddingModel", "Embedding model"),
    ("model", "Model"),
    ("healthy", "Healthy"),
    ("unavailable", "Unavailable"),
    ("sources", "Sources"),
    ("save", "Save"),
    ("cancel", "Cancel"),
    ("loading", "Loading..."),
    ("error", "Error"),
    ("success", "Success"),
];

fn table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::ZhCn => ZH_CN,
        Language::En => EN,
    }
}

/// Look up `key`; unknown keys come back unchanged.
pub fn translate<'a>(language: Language, key: &'a str) -> &'a str {
    table(language)
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_both_languages() {
        assert_eq!(translate(Language::ZhCn, "dashboard"), "仪表板");
        assert_eq!(translate(Language::En, "dashboard"), "Dashboard");
    }

    #[test]
    fn test_unknown_key_returned_verbatim() {
        assert_eq!(translate(Language::En, "noSuchKey"), "noSuchKey");
    }

    #[test]
    fn test_tables_have_same_keys() {
        let zh: Vec<_> = ZH_CN.iter().map(|(k, _)| *k).collect();
        let en: Vec<_> = EN.iter().map(|(k, _)| *k).collect();
        assert_eq!(zh, en);
    }
}
