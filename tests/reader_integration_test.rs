// ==========================================
// 工作簿数据映射系统 - 读取器集成测试
// ==========================================
// 覆盖: Excel 工作簿读取（含单表降级）、分隔文本读取、格式分派
// ==========================================

mod test_helpers;

use std::path::Path;
use tempfile::TempDir;
use test_helpers::{text_row, write_txt, write_xlsx};
use workbook_mapper::importer::{DocumentReader, ErrorKind, SheetParser};
use workbook_mapper::{
    logging, CellValue, DelimitedTextReader, ImportError, ReaderOptions, UniversalFileParser,
    WorkbookReader,
};

fn infer_options() -> ReaderOptions {
    ReaderOptions {
        infer_cell_types: true,
        ..ReaderOptions::default()
    }
}

#[tokio::test]
async fn test_read_xlsx_document() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(
        dir.path(),
        "Scores.xlsx",
        &[(
            "Sheet1",
            vec![
                text_row(&["Name", "Score", "Passed"]),
                vec![CellValue::from("Ann"), CellValue::from(90.0), CellValue::from(true)],
                vec![CellValue::from("Bob"), CellValue::from(55.5), CellValue::from(false)],
            ],
        )],
    )
    .unwrap();

    let document = WorkbookReader::default().read(&path).await.unwrap();

    assert_eq!(document.name(), "Scores");
    assert_eq!(document.sheet_count(), 1);
    let sheet = &document.sheets()[0];
    assert_eq!(sheet.name(), "Sheet1");
    assert_eq!(sheet.header().titles(), &["Name", "Score", "Passed"]);
    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.rows()[0][1], CellValue::Numeric(90.0));
    assert_eq!(sheet.rows()[1][2], CellValue::Boolean(false));
}

#[tokio::test]
async fn test_read_xlsx_drops_only_the_broken_sheet() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(
        dir.path(),
        "Mixed.xlsx",
        &[
            ("Good", vec![text_row(&["Id"]), vec![CellValue::from(1.0)]]),
            // 数值表头无法构成列标题
            (
                "Broken",
                vec![vec![CellValue::from(1.0), CellValue::from(2.0)], text_row(&["a", "b"])],
            ),
            ("Also", vec![text_row(&["Id"]), vec![CellValue::from(2.0)]]),
        ],
    )
    .unwrap();

    let document = WorkbookReader::default().read(&path).await.unwrap();

    let names: Vec<&str> = document.sheets().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["Good", "Also"]);
}

#[tokio::test]
async fn test_read_named_overrides_document_name() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(
        dir.path(),
        "data.xlsx",
        &[("Sheet1", vec![text_row(&["Id"]), vec![CellValue::from(1.0)]])],
    )
    .unwrap();

    let reader = WorkbookReader::default();
    assert_eq!(reader.read_named("Catalog", &path).await.unwrap().name(), "Catalog");
    assert_eq!(reader.read_named("  ", &path).await.unwrap().name(), "data");
}

#[tokio::test]
async fn test_read_missing_workbook_fails() {
    let err = WorkbookReader::default()
        .read(Path::new("/nonexistent/Book.xlsx"))
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::MalformedSource);
}

#[tokio::test]
async fn test_lock_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(
        dir.path(),
        "~$Book.xlsx",
        &[("Sheet1", vec![text_row(&["Id"]), vec![CellValue::from(1.0)]])],
    )
    .unwrap();

    let err = WorkbookReader::default().read(&path).await.unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn test_read_text_files_as_one_document() {
    let dir = TempDir::new().unwrap();
    let first = write_txt(dir.path(), "a.txt", &["Name\tScore", "Ann\t90", "Bob\t55"]).unwrap();
    let second = write_txt(dir.path(), "b.txt", &["Name\tScore", "Cid\t70"]).unwrap();

    let document = DelimitedTextReader::default()
        .read("Scores", &[first, second])
        .await
        .unwrap();

    assert_eq!(document.name(), "Scores");
    assert_eq!(document.sheet_count(), 2);
    assert_eq!(document.sheets()[0].name(), "a.txt");
    assert_eq!(document.sheets()[0].row_count(), 2);
    // 未开启类型推断时一律为文本
    assert_eq!(document.sheets()[0].rows()[0][1], CellValue::from("90"));
}

#[tokio::test]
async fn test_text_type_inference() {
    let dir = TempDir::new().unwrap();
    let path = write_txt(dir.path(), "a.txt", &["Name\tScore\tOk", "Ann\t90.5\ttrue", "Bob\t\tFALSE"])
        .unwrap();

    let document = DelimitedTextReader::new(infer_options())
        .read("Scores", &[path])
        .await
        .unwrap();

    let rows = document.sheets()[0].rows();
    assert_eq!(rows[0][1], CellValue::Numeric(90.5));
    assert_eq!(rows[0][2], CellValue::Boolean(true));
    assert_eq!(rows[1][1], CellValue::Absent);
    assert_eq!(rows[1][2], CellValue::Boolean(false));
}

#[tokio::test]
async fn test_malformed_text_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let good = write_txt(dir.path(), "a.txt", &["Id", "1"]).unwrap();
    let bad = write_txt(dir.path(), "b.txt", &["Id", "1\textra"]).unwrap();

    let err = DelimitedTextReader::default()
        .read("Book", &[good, bad])
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::MalformedSheet { ref sheet, .. } if sheet == "b.txt"));
}

#[tokio::test]
async fn test_trailing_empty_fields_are_ignored() {
    let dir = TempDir::new().unwrap();
    let path = write_txt(dir.path(), "a.txt", &["Id\tName", "1\tAnn\t\t"]).unwrap();

    let document = DelimitedTextReader::default().read("Book", &[path]).await.unwrap();
    assert_eq!(document.sheets()[0].rows()[0].len(), 2);
}

#[tokio::test]
async fn test_header_only_text_file_is_empty_sheet() {
    let dir = TempDir::new().unwrap();
    let path = write_txt(dir.path(), "a.txt", &["Id\tName"]).unwrap();

    let err = DelimitedTextReader::default().read("Book", &[path]).await.unwrap_err();
    assert!(matches!(err, ImportError::EmptySheet { .. }));
}

#[tokio::test]
async fn test_read_dir_sorts_text_files() {
    let dir = TempDir::new().unwrap();
    write_txt(dir.path(), "2_b.txt", &["Id", "2"]).unwrap();
    write_txt(dir.path(), "1_a.txt", &["Id", "1"]).unwrap();
    write_txt(dir.path(), "notes.csv", &["ignored"]).unwrap();

    let document = DelimitedTextReader::default()
        .read_dir("Book", dir.path())
        .await
        .unwrap();

    let names: Vec<&str> = document.sheets().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["1_a.txt", "2_b.txt"]);
}

#[tokio::test]
async fn test_read_dir_without_text_files_fails() {
    let dir = TempDir::new().unwrap();
    let err = DelimitedTextReader::default()
        .read_dir("Book", dir.path())
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::FileReadError(_)));
}

#[test]
fn test_custom_separator() {
    let dir = TempDir::new().unwrap();
    let path = write_txt(dir.path(), "a.txt", &["Id;Name", "1;Ann"]).unwrap();
    let reader = DelimitedTextReader::new(ReaderOptions {
        separator: ';',
        ..ReaderOptions::default()
    });

    let sheets = reader.parse_sheets(&path, "Book").unwrap();
    assert_eq!(sheets[0].header().titles(), &["Id", "Name"]);
}

#[test]
fn test_universal_parser_dispatch() {
    let dir = TempDir::new().unwrap();
    let txt = write_txt(dir.path(), "a.txt", &["Id", "1"]).unwrap();
    let xlsx = write_xlsx(
        dir.path(),
        "b.xlsx",
        &[("Sheet1", vec![text_row(&["Id"]), vec![CellValue::from(1.0)]])],
    )
    .unwrap();
    let csv = write_txt(dir.path(), "c.csv", &["Id", "1"]).unwrap();

    let parser = UniversalFileParser::default();
    assert_eq!(parser.parse_sheets(&txt, "Book").unwrap()[0].name(), "a.txt");
    assert_eq!(parser.parse_sheets(&xlsx, "Book").unwrap()[0].name(), "Sheet1");
    assert!(matches!(
        parser.parse_sheets(&csv, "Book"),
        Err(ImportError::UnsupportedFormat(_))
    ));
}

#[tokio::test]
async fn test_document_reader_trait_objects() {
    let dir = TempDir::new().unwrap();
    let first = write_xlsx(
        dir.path(),
        "first.xlsx",
        &[("Sheet1", vec![text_row(&["Id"]), vec![CellValue::from(1.0)]])],
    )
    .unwrap();
    let second = write_xlsx(
        dir.path(),
        "second.xlsx",
        &[("Sheet1", vec![text_row(&["Id"]), vec![CellValue::from(2.0)]])],
    )
    .unwrap();
    let txt = write_txt(dir.path(), "a.txt", &["Id", "3"]).unwrap();

    let readers: Vec<(Box<dyn DocumentReader>, Vec<std::path::PathBuf>)> = vec![
        (Box::new(WorkbookReader::default()), vec![first, second]),
        (Box::new(DelimitedTextReader::default()), vec![txt]),
    ];

    let mut counts = Vec::new();
    for (reader, files) in &readers {
        let document = reader.read_document("Combined", files).await.unwrap();
        assert_eq!(document.name(), "Combined");
        counts.push(document.sheet_count());
    }
    assert_eq!(counts, vec![2, 1]);
}
