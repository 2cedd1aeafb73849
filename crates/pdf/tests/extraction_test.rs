//! # Table and Text Extraction Tests
//!
//! Runs both extractors over PDFs generated on the fly and checks page numbering,
//! header promotion, row width and the degrade-to-warning behavior on broken input.

use anyhow::Result;
use onboard_pdf::{extract_tables, extract_text, ExtractError};
use onboard_test_utils::helpers::{
    generate_cjk_pdf, generate_cjk_text_pdf, generate_test_pdf, generate_text_pdf,
    generate_text_pdf_with_broken_page, grid, PlacedText,
};

fn leave_table() -> Vec<PlacedText> {
    grid(
        72.0,
        700.0,
        &[
            &["Leave", "Days", "Approver"],
            &["Annual", "14", "Manager"],
            &["Sick", "30", "HR"],
        ],
    )
}

#[test]
fn test_text_page_count_and_joins() -> Result<()> {
    let pdf = generate_text_pdf(&["Welcome aboard", "Annual leave is 14 days", "Sick leave"])?;

    let extraction = extract_text(&pdf);

    assert!(extraction.warning.is_none());
    assert_eq!(extraction.page_count, 3);
    assert_eq!(
        extraction.text,
        "Welcome aboard\nAnnual leave is 14 days\nSick leave\n"
    );
    assert_eq!(extraction.text.matches('\n').count(), 3);
    Ok(())
}

#[test]
fn test_blank_pages_contribute_nothing() -> Result<()> {
    let pdf = generate_text_pdf(&["First", "", "Third"])?;

    let extraction = extract_text(&pdf);

    assert_eq!(extraction.page_count, 3);
    assert_eq!(extraction.text, "First\nThird\n");
    Ok(())
}

#[test]
fn test_tables_are_reported_per_page_in_order() -> Result<()> {
    let pdf = generate_test_pdf(&[
        leave_table(),
        vec![PlacedText::new(72.0, 760.0, "Just a paragraph.")],
        grid(
            72.0,
            700.0,
            &[&["Item", "Owner", "Note"], &["Laptop", "IT", ""], &["Badge", "Security", "Day one"]],
        ),
    ])?;

    let extraction = extract_tables(&pdf);

    assert!(extraction.warning.is_none());
    let pages: Vec<u32> = extraction.tables.iter().map(|t| t.page_number).collect();
    assert_eq!(pages, vec![1, 3]);

    let first = &extraction.tables[0];
    assert_eq!(first.headers, vec!["Leave", "Days", "Approver"]);
    assert_eq!(
        first.rows,
        vec![
            vec![Some("Annual".into()), Some("14".into()), Some("Manager".into())],
            vec![Some("Sick".into()), Some("30".into()), Some("HR".into())],
        ]
    );

    let third = &extraction.tables[1];
    assert_eq!(third.rows[0], vec![Some("Laptop".into()), Some("IT".into()), None]);
    for table in &extraction.tables {
        assert!(table.rows.iter().all(|r| r.len() == table.headers.len()));
    }
    Ok(())
}

#[test]
fn test_document_without_tables_yields_none() -> Result<()> {
    let pdf = generate_text_pdf(&["Code of conduct", "Dress code"])?;

    let extraction = extract_tables(&pdf);

    assert!(extraction.warning.is_none());
    assert!(extraction.tables.is_empty());
    Ok(())
}

#[test]
fn test_table_page_text_is_still_extracted() -> Result<()> {
    let pdf = generate_test_pdf(&[leave_table()])?;

    let extraction = extract_text(&pdf);

    assert_eq!(extraction.page_count, 1);
    assert!(extraction.text.contains("Leave Days Approver"));
    assert!(extraction.text.contains("Sick 30 HR"));
    Ok(())
}

#[test]
fn test_broken_pdf_degrades_to_warnings() {
    let garbage = b"this is not a pdf at all";

    let tables = extract_tables(garbage);
    assert!(tables.tables.is_empty());
    assert!(matches!(
        tables.warning,
        Some(ExtractError::TableExtractionFailed(_))
    ));

    let text = extract_text(garbage);
    assert_eq!(text.text, "");
    assert_eq!(text.page_count, 0);
    assert!(matches!(
        text.warning,
        Some(ExtractError::TextExtractionFailed { pages_read: 0, .. })
    ));
}

#[test]
fn test_cjk_text_is_decoded_through_to_unicode() -> Result<()> {
    let pdf = generate_cjk_text_pdf(&["假期", "年度健檢每年一次"])?;

    let extraction = extract_text(&pdf);

    assert!(extraction.warning.is_none());
    assert_eq!(extraction.page_count, 2);
    assert_eq!(extraction.text, "假期\n年度健檢每年一次\n");
    Ok(())
}

#[test]
fn test_cjk_table_cells_are_decoded() -> Result<()> {
    let pdf = generate_cjk_pdf(&[grid(
        72.0,
        700.0,
        &[&["假別", "天數"], &["特休", "14"], &["病假", "30"]],
    )])?;

    let extraction = extract_tables(&pdf);

    assert!(extraction.warning.is_none());
    assert_eq!(extraction.tables.len(), 1);
    let table = &extraction.tables[0];
    assert_eq!(table.headers, vec!["假別", "天數"]);
    assert_eq!(
        table.rows,
        vec![
            vec![Some("特休".into()), Some("14".into())],
            vec![Some("病假".into()), Some("30".into())],
        ]
    );
    Ok(())
}

#[test]
fn test_failure_mid_document_keeps_earlier_pages() -> Result<()> {
    let pdf = generate_text_pdf_with_broken_page(&["Welcome aboard", "Lost page", "Never read"], 1)?;

    let extraction = extract_text(&pdf);

    assert_eq!(extraction.text, "Welcome aboard\n");
    assert_eq!(extraction.page_count, 3);
    assert!(matches!(
        extraction.warning,
        Some(ExtractError::TextExtractionFailed { pages_read: 1, .. })
    ));

    let tables = extract_tables(&pdf);
    assert!(tables.tables.is_empty());
    assert!(matches!(
        tables.warning,
        Some(ExtractError::TableExtractionFailed(_))
    ));
    Ok(())
}
