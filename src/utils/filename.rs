//! 文件名安全处理
//!
//! 上传文件名和下载路径参数都要经过这里，保证只落在指定目录内

use std::sync::OnceLock;

use regex::Regex;

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("静态正则表达式"))
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("静态正则表达式"))
}

/// 把任意客户端文件名变成安全的本地文件名
///
/// - 只保留最后一个路径分量（`/` 和 `\` 都视为分隔符）
/// - 空白替换为 `_`，其余非 `[A-Za-z0-9_.-]` 字符直接丢弃
/// - 去掉首尾的 `.` 和 `_`，因此 `..` 之类的名字会变成空串
pub fn secure_filename(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or("");
    let joined = whitespace().replace_all(last.trim(), "_");
    let cleaned = unsafe_chars().replace_all(&joined, "");
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// 取出小写扩展名（最后一个 `.` 之后的部分）
pub fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// 文件名是否带有允许的扩展名
pub fn allowed_file(name: &str, allowed_extensions: &[String]) -> bool {
    match extension_of(name) {
        Some(ext) => allowed_extensions.iter().any(|a| a == &ext),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["pdf".to_string(), "txt".to_string(), "docx".to_string()]
    }

    #[test]
    fn test_secure_filename_strips_paths() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename(r"C:\Users\me\notes.txt"), "notes.txt");
        assert_eq!(secure_filename("my lecture notes.pdf"), "my_lecture_notes.pdf");
        assert_eq!(secure_filename(".."), "");
        assert_eq!(secure_filename(".hidden.txt"), "hidden.txt");
    }

    #[test]
    fn test_secure_filename_drops_unsafe_chars() {
        assert_eq!(secure_filename("résumé?.docx"), "rsum.docx");
        assert_eq!(secure_filename("generated_mcqs_abc.pdf"), "generated_mcqs_abc.pdf");
    }

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("chapter.PDF", &allowed()));
        assert!(allowed_file("a.b.txt", &allowed()));
        assert!(!allowed_file("slides.pptx", &allowed()));
        assert!(!allowed_file("README", &allowed()));
        assert!(!allowed_file("trailing.", &allowed()));
    }
}
