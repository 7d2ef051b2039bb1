// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 生成测试用工作簿 (.xlsx) 与分隔文本 (.txt) 文件
// ==========================================
#![allow(dead_code)]

use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use workbook_mapper::CellValue;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 测试用工作表: (名称, 单元格网格; 第一行为表头)
pub type SheetFixture<'a> = (&'a str, Vec<Vec<CellValue>>);

/// 文本单元格行
pub fn text_row(values: &[&str]) -> Vec<CellValue> {
    values.iter().map(|v| CellValue::from(*v)).collect()
}

/// 写入分隔文本文件
///
/// # 参数
/// - dir: 目标目录
/// - file_name: 文件名（含扩展名）
/// - lines: 每行文本,字段已用分隔符连接
pub fn write_txt(dir: &Path, file_name: &str, lines: &[&str]) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(file_name);
    let mut file = File::create(&path)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    Ok(path)
}

/// 写入最小化 .xlsx 工作簿
///
/// 文本单元格使用 inlineStr,不生成 sharedStrings / styles 部件
pub fn write_xlsx(
    dir: &Path,
    file_name: &str,
    sheets: &[SheetFixture<'_>],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(file_name);
    let mut zip = ZipWriter::new(File::create(&path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(content_types(sheets.len()).as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(workbook_xml(sheets).as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(workbook_rels(sheets.len()).as_bytes())?;

    for (idx, (_, grid)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)?;
        zip.write_all(sheet_xml(grid).as_bytes())?;
    }

    zip.finish()?;
    Ok(path)
}

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

fn content_types(sheet_count: usize) -> String {
    let overrides: String = (1..=sheet_count)
        .map(|n| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                n
            )
        })
        .collect();
    format!(
        r#"{}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{}</Types>"#,
        XML_DECL, overrides
    )
}

fn workbook_xml(sheets: &[SheetFixture<'_>]) -> String {
    let entries: String = sheets
        .iter()
        .enumerate()
        .map(|(idx, (name, _))| {
            format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(name),
                idx + 1,
                idx + 1
            )
        })
        .collect();
    format!(
        r#"{}
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
        XML_DECL, entries
    )
}

fn workbook_rels(sheet_count: usize) -> String {
    let entries: String = (1..=sheet_count)
        .map(|n| {
            format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                n, n
            )
        })
        .collect();
    format!(
        r#"{}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        XML_DECL, entries
    )
}

fn sheet_xml(grid: &[Vec<CellValue>]) -> String {
    let mut rows = String::new();
    for (r, cells) in grid.iter().enumerate() {
        rows.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in cells.iter().enumerate() {
            let reference = format!("{}{}", column_letter(c), r + 1);
            match cell {
                CellValue::Absent => {}
                CellValue::Text(v) => rows.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    reference,
                    escape(v)
                )),
                CellValue::Numeric(v) => {
                    rows.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, v))
                }
                CellValue::Boolean(v) => rows.push_str(&format!(
                    r#"<c r="{}" t="b"><v>{}</v></c>"#,
                    reference,
                    u8::from(*v)
                )),
            }
        }
        rows.push_str("</row>");
    }
    format!(
        r#"{}
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        XML_DECL, rows
    )
}

// 测试数据不超过 26 列
fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
