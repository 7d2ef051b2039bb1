// ==========================================
// 工作簿数据映射系统 - 表格值模型测试
// ==========================================
// 覆盖: 表头等价关系、行列视图一致性、文档概要
// ==========================================

use workbook_mapper::{CellKind, CellValue, Document, Header, Row, Sheet};

fn sheet(name: &str, titles: &[&str], rows: &[&[f64]]) -> Sheet {
    Sheet::new(
        "Book",
        name,
        Header::new(titles.iter().copied()),
        rows.iter()
            .map(|r| Row::new(r.iter().map(|v| CellValue::from(*v)).collect()))
            .collect(),
    )
    .expect("构造工作表失败")
}

#[test]
fn test_header_merge_is_an_equivalence() {
    let a = Header::new(["Id", "Name"]);
    let b = Header::new(["Id", "Name"]);
    let c = Header::new(["Id", "Name"]);
    let reordered = Header::new(["Name", "Id"]);

    // 自反
    assert!(a.merge(&a));
    // 对称
    assert_eq!(a.merge(&b), b.merge(&a));
    assert_eq!(a.merge(&reordered), reordered.merge(&a));
    // 传递
    assert!(a.merge(&b) && b.merge(&c) && a.merge(&c));

    assert!(!a.merge(&reordered));
    assert!(!a.merge(&Header::new(["Id"])));
}

#[test]
fn test_rows_and_columns_are_two_views() {
    let sheet = sheet("Sheet1", &["A", "B", "C"], &[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);

    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.column_count(), 3);
    for (c, column) in sheet.columns().iter().enumerate() {
        assert_eq!(column.title(), sheet.header().titles()[c]);
        assert_eq!(column.len(), sheet.row_count());
        for (r, row) in sheet.rows().iter().enumerate() {
            assert_eq!(&row[c], &column.cells()[r]);
        }
    }
    assert_eq!(sheet.column("B").map(|c| c.cells()[1].clone()), Some(CellValue::Numeric(5.0)));
}

#[test]
fn test_grid_pads_short_rows_with_absent() {
    let sheet = Sheet::from_grid(
        "Book",
        "Sheet1",
        vec![
            vec![CellValue::from("Id"), CellValue::from("Name"), CellValue::from("Note")],
            vec![CellValue::from(1.0)],
        ],
    )
    .unwrap();

    assert_eq!(sheet.rows()[0].len(), 3);
    assert_eq!(sheet.rows()[0][2].kind(), CellKind::Absent);
    // 表头不计入数据行
    assert_eq!(sheet.row_count(), 1);
}

#[test]
fn test_document_sheet_count_matches_construction() {
    for n in 0..4 {
        let sheets = (0..n)
            .map(|i| sheet(&format!("Sheet{}", i + 1), &["A"], &[&[i as f64]]))
            .collect();
        let document = Document::new("Book", sheets);
        assert_eq!(document.sheet_count(), n);
        assert_eq!(document.summary().sheets.len(), n);
    }
}

#[test]
fn test_document_lookup_and_summary() {
    let document = Document::new(
        "Book",
        vec![
            sheet("Orders", &["Id", "Qty"], &[&[1.0, 2.0]]),
            sheet("Lines", &["Id"], &[&[1.0], &[2.0]]),
        ],
    );

    assert_eq!(document.first_sheet().map(Sheet::name), Some("Orders"));
    assert_eq!(document.sheet("Lines").map(Sheet::row_count), Some(2));
    assert!(document.sheet("lines").is_none());

    let summary = serde_json::to_value(document.summary()).unwrap();
    assert_eq!(summary["name"], "Book");
    assert_eq!(summary["sheets"][0]["header"][1], "Qty");
    assert_eq!(summary["sheets"][1]["row_count"], 2);
}
