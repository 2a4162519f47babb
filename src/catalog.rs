//! 界面文案目录
//!
//! 目录是键到基准语言文案的有序映射，在构造后保持不变。
//! 批量翻译依赖目录的迭代顺序：第 i 条文案的译文对应第 i 个目录键。

use std::collections::HashMap;

use crate::error::{TranslationError, TranslationResult};

/// 目录条目：键 + 基准语言文案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: String,
    pub text: String,
}

/// 有序的界面文案目录
///
/// 键唯一，顺序为创作顺序。查找通过索引完成，枚举按创作顺序进行。
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// 从键值对序列构造目录，保持输入顺序
    ///
    /// 出现重复键时返回配置错误。
    pub fn from_entries<I, K, V>(pairs: I) -> TranslationResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut catalog = Catalog::default();

        for (key, text) in pairs {
            let key = key.into();
            if catalog.index.contains_key(&key) {
                return Err(TranslationError::ConfigError(format!(
                    "目录键重复: {}",
                    key
                )));
            }
            catalog.index.insert(key.clone(), catalog.entries.len());
            catalog.entries.push(CatalogEntry {
                key,
                text: text.into(),
            });
        }

        Ok(catalog)
    }

    /// 内置的界面文案目录（基准语言为英文）
    pub fn builtin() -> Self {
        let mut catalog = Catalog {
            entries: Vec::with_capacity(BASE_STRINGS.len()),
            index: HashMap::with_capacity(BASE_STRINGS.len()),
        };

        // 内置表在编译期固定，键不重复
        for (key, text) in BASE_STRINGS {
            catalog.index.insert((*key).to_string(), catalog.entries.len());
            catalog.entries.push(CatalogEntry {
                key: (*key).to_string(),
                text: (*text).to_string(),
            });
        }

        catalog
    }

    /// 查找键对应的基准语言文案
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].text.as_str())
    }

    /// 目录中是否存在该键
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// 按创作顺序枚举目录键
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    /// 按创作顺序收集全部基准文案（批量翻译的输入）
    pub fn base_texts(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.text.clone()).collect()
    }

    /// 按创作顺序枚举目录条目
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// 目录条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 目录是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 内置目录的基准文案表
///
/// 覆盖家长服务界面的全部固定文案，创作顺序即展示顺序。
const BASE_STRINGS: &[(&str, &str)] = &[
    ("title", "Parent in the Loop"),
    ("subtitle", "We help parents understand their child's school"),
    ("schoolHelper", "Your School Helper"),
    ("schoolHelperDesc", "Ask questions and get help right away"),
    ("uploadPapers", "Upload School Papers"),
    (
        "uploadDesc",
        "Upload files (PDF, Word) or take photos of school papers",
    ),
    (
        "uploadSubDesc",
        "Report cards, letters from school, IEP papers, etc.",
    ),
    ("chooseFiles", "Choose Files or Photos"),
    (
        "greeting",
        "Hello! I am here to help you with your child's school. You can upload school papers or photos, and I will help you understand what to do next.",
    ),
    (
        "askPlaceholder",
        "Ask about your child's school, your rights, or what to do next...",
    ),
    ("actionTitle", "What You Need to Do Now"),
    ("actionDesc", "Important things to do and when to do them"),
    ("schoolMeeting", "School Meeting - Answer Needed"),
    ("answerBy", "You must answer by March 15, 2024"),
    ("showWhatToDo", "Show Me What to Do"),
    ("reportCard", "Report Card - Done"),
    ("nextStep", "Next: Talk to your child's teacher"),
    ("understandingRules", "Understanding School Rules"),
    ("rulesDesc", "We explain school processes in simple words"),
    ("iepMeeting", "IEP Meeting"),
    (
        "iepDesc",
        "A meeting to talk about special help for your child at school...",
    ),
    ("learnMore", "Learn More"),
    ("plan504", "504 Plan"),
    (
        "plan504Desc",
        "Special help for children who need extra support in school...",
    ),
    ("rightsTitle", "Your Rights as a Parent"),
    ("rightsDesc", "Know what you can do and ask for at school"),
    ("whatYouCanDo", "What You Can Do"),
    ("rightsText1", "You can join school meetings about your child"),
    ("rightsText2", "You can ask for tests to help your child"),
    ("rightsText3", "You can see your child's school records"),
    ("emailExamples", "Email Examples"),
    ("questionsToAsk", "Questions to Ask"),
    ("helpNearYou", "Help Near You"),
    ("helpNearYouDesc", "Services and programs in your area"),
    ("specialEdHelp", "Special Education Help"),
    ("specialEdDesc", "3 programs available in your area"),
    ("collegePrepHelp", "College Prep Programs"),
    ("collegePrepDesc", "5 programs taking new students"),
    ("seeAllHelp", "See All Help Available"),
    ("howChildDoing", "How Your Child is Doing"),
    (
        "howChildDoingDesc",
        "What your child's grades mean for their future",
    ),
    ("schoolPerformance", "School Performance"),
    (
        "schoolPerformanceDesc",
        "Your child is doing well in math and reading. They might be ready for harder classes.",
    ),
    ("futureOptions", "Future Options"),
    (
        "futureOptionsDesc",
        "Your child can take college prep classes to get ready for university.",
    ),
    ("papersReady", "Papers Ready"),
    ("settings", "Settings"),
    (
        "aiResponse",
        "I understand. Let me look at your school papers and help you know what to do. I will give you simple steps to follow.",
    ),
];
