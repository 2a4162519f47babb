//! 支持的语言集合
//!
//! 语言集合在编译期固定。每个成员包含小写 ISO-639-1 代码、
//! 英文显示名和用于界面展示的旗帜表情。

/// 语言描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// 小写 ISO-639-1 语言代码
    pub code: &'static str,
    /// 英文显示名
    pub name: &'static str,
    /// 旗帜表情
    pub flag: &'static str,
}

/// 界面支持的全部语言
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English", flag: "🇺🇸" },
    Language { code: "es", name: "Spanish", flag: "🇪🇸" },
    Language { code: "fr", name: "French", flag: "🇫🇷" },
    Language { code: "de", name: "German", flag: "🇩🇪" },
    Language { code: "it", name: "Italian", flag: "🇮🇹" },
    Language { code: "pt", name: "Portuguese", flag: "🇧🇷" },
    Language { code: "ru", name: "Russian", flag: "🇷🇺" },
    Language { code: "ja", name: "Japanese", flag: "🇯🇵" },
    Language { code: "zh", name: "Chinese", flag: "🇨🇳" },
    Language { code: "ko", name: "Korean", flag: "🇰🇷" },
    Language { code: "nl", name: "Dutch", flag: "🇳🇱" },
    Language { code: "pl", name: "Polish", flag: "🇵🇱" },
];

/// 按代码查找语言
pub fn find_language(code: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES.iter().find(|lang| lang.code == code)
}

/// 语言代码是否在支持集合内
pub fn is_supported(code: &str) -> bool {
    find_language(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_language() {
        let spanish = find_language("es").unwrap();
        assert_eq!(spanish.name, "Spanish");
        assert_eq!(spanish.flag, "🇪🇸");

        assert!(find_language("xx").is_none());
        // 集合内只有小写代码
        assert!(find_language("ES").is_none());
    }

    #[test]
    fn test_supported_set() {
        assert_eq!(SUPPORTED_LANGUAGES.len(), 12);
        assert!(is_supported("en"));
        assert!(is_supported("pl"));
        assert!(!is_supported("ar"));
    }

    #[test]
    fn test_codes_unique() {
        let mut codes: Vec<&str> = SUPPORTED_LANGUAGES.iter().map(|l| l.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), SUPPORTED_LANGUAGES.len());
    }
}
