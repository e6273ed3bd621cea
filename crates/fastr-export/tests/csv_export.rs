//! CsvReceiptWriter against a real directory.

use std::fs;

use chrono::{Local, TimeZone};
use fastr_core::{Cart, Money, Product, TaxRate};
use fastr_export::{CsvReceiptWriter, ExportError, ReceiptSink};

fn checkout_cart() -> Cart {
    let mut cart = Cart::new(TaxRate::from_bps(1000));
    let shirt = Product::new(1u64, "T-Shirt", Money::from_major(500)).with_tag("99231131167");
    let cap = Product::new(4u64, "Cap", Money::from_major(250)).with_tag("17072247175");
    cart.add(&shirt, 2).unwrap();
    cart.add(&cap, 1).unwrap();
    cart
}

#[test]
fn creates_directory_and_writes_header_then_rows() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("nested").join("exports");
    let writer = CsvReceiptWriter::new(&dir);
    let at = Local.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();

    let receipt = writer.export(&checkout_cart().snapshot(), at).unwrap();

    assert!(!receipt.appended);
    assert_eq!(receipt.rows, 2);
    assert_eq!(receipt.totals.total, Money::from_major(1375));
    assert_eq!(receipt.path, dir.join("kart_products_20240501103000.csv"));

    let contents = fs::read_to_string(&receipt.path).unwrap();
    assert_eq!(
        contents,
        "Product ID,Title,Rate,Quantity\n1,T-Shirt,500.00,2\n4,Cap,250.00,1\n"
    );
}

#[test]
fn same_second_appends_without_second_header() {
    let dir = tempfile::tempdir().unwrap();
    let writer = CsvReceiptWriter::new(dir.path());
    let at = Local.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();

    let first = writer.export(&checkout_cart().snapshot(), at).unwrap();
    let second = writer.export(&checkout_cart().snapshot(), at).unwrap();

    assert!(!first.appended);
    assert!(second.appended);
    assert_eq!(first.path, second.path);
    assert_ne!(first.id, second.id);

    let contents = fs::read_to_string(&second.path).unwrap();
    assert_eq!(contents.matches("Product ID,Title,Rate,Quantity").count(), 1);
    assert_eq!(contents.lines().count(), 5);
}

#[test]
fn titles_with_commas_are_quoted() {
    let dir = tempfile::tempdir().unwrap();
    let writer = CsvReceiptWriter::new(dir.path());
    let mut cart = Cart::new(TaxRate::from_bps(1000));
    cart.add(
        &Product::new("SKU-7", "Mug, large", Money::from_minor(34_950)),
        1,
    )
    .unwrap();

    let at = Local.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
    let receipt = writer.export(&cart.snapshot(), at).unwrap();

    let contents = fs::read_to_string(&receipt.path).unwrap();
    assert!(contents.ends_with("SKU-7,\"Mug, large\",349.50,1\n"));
}

#[test]
fn unwritable_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("exports");
    fs::write(&blocker, "not a directory").unwrap();

    let writer = CsvReceiptWriter::new(&blocker);
    let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let err = writer.export(&checkout_cart().snapshot(), at).unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));
}
