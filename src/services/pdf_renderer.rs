//! PDF 渲染
//!
//! 把题目文本按段落排进 A4 页面：内置 Helvetica 12pt，自动换页。
//! 不解析题目结构，只做简单的自动折行。

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::error::RenderError;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_X: f32 = 10.0;
const MARGIN_TOP: f32 = 10.0;
/// 自动换页的下边距
const MARGIN_BOTTOM: f32 = 15.0;
const FONT_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 10.0;
/// 190mm 可用宽度下 Helvetica 12pt 大约能放下的字符数
const MAX_LINE_CHARS: usize = 90;

/// 渲染并写入文件
pub fn render_to_file(text: &str, path: &Path) -> Result<(), RenderError> {
    let doc = render(text)?;
    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer).map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(())
}

/// 渲染为 PDF 文档
///
/// 内置字体只能编码 Latin-1，遇到其他字符直接报错
pub fn render(text: &str) -> Result<PdfDocumentReference, RenderError> {
    check_encodable(text)?;

    let (doc, page, layer) = PdfDocument::new("Generated MCQs", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    let mut cursor = PageCursor {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        font,
        y: PAGE_HEIGHT - MARGIN_TOP,
    };

    for paragraph in text.lines() {
        for line in wrap_text(paragraph, MAX_LINE_CHARS) {
            cursor.write_line(&line);
        }
    }
    drop(cursor);

    Ok(doc)
}

struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    y: f32,
}

impl PageCursor<'_> {
    fn write_line(&mut self, line: &str) {
        if self.y - LINE_HEIGHT < MARGIN_BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN_TOP;
        }
        self.y -= LINE_HEIGHT;
        if !line.is_empty() {
            self.layer
                .use_text(line, FONT_SIZE, Mm(MARGIN_X), Mm(self.y), &self.font);
        }
    }
}

fn check_encodable(text: &str) -> Result<(), RenderError> {
    for (idx, line) in text.lines().enumerate() {
        if let Some(ch) = line.chars().find(|c| (*c as u32) > 0xFF) {
            return Err(RenderError::UnsupportedCharacter { ch, line: idx + 1 });
        }
    }
    Ok(())
}

/// 按单词折行；超长单词按字符硬切
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(max_chars).collect();
            word = word.chars().skip(max_chars).collect();
            lines.push(head);
        }
        if current.chars().count() + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
