//! Cart rehydration from the on-disk record.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pbs_core::LineItemId;
use pbs_integration_tests::line;
use pbs_storefront::cart::{CartRepository, CartStore, DEFAULT_CART_KEY, FilePersistence};
use rust_decimal::Decimal;
use tempfile::TempDir;

fn open(dir: &TempDir) -> CartStore {
    CartStore::open(Arc::new(FilePersistence::new(dir.path(), DEFAULT_CART_KEY)))
}

#[test]
fn test_cart_survives_relaunch() {
    let dir = TempDir::new().unwrap();
    {
        let cart = open(&dir);
        cart.add(line(7, "Custom Paper Cups", Some("12oz"), 500, 248)).unwrap();
        cart.add(line(3, "Branded Tissue Paper", None, 100, 150)).unwrap();
        cart.add(line(7, "Custom Paper Cups", Some("12oz"), 250, 196)).unwrap();
    }

    let cart = open(&dir);
    let items = cart.list();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, LineItemId::new("7-12oz"));
    assert_eq!(items[0].qty, 250);
    assert_eq!(cart.summary().subtotal, Decimal::new(64_000, 2));
}

#[test]
fn test_removal_and_clear_survive_relaunch() {
    let dir = TempDir::new().unwrap();
    {
        let cart = open(&dir);
        cart.add(line(7, "Custom Paper Cups", Some("12oz"), 500, 248)).unwrap();
        cart.add(line(3, "Branded Tissue Paper", None, 100, 150)).unwrap();
        cart.remove(&LineItemId::new("7-12oz")).unwrap();
    }
    assert_eq!(open(&dir).len(), 1);

    open(&dir).clear().unwrap();
    assert!(open(&dir).is_empty());
}

#[test]
fn test_running_store_overwrites_outside_edits() {
    let dir = TempDir::new().unwrap();
    let server = open(&dir);
    server.add(line(7, "Custom Paper Cups", Some("12oz"), 500, 248)).unwrap();

    // A second process edits the record behind the running store's back
    open(&dir).add(line(3, "Branded Tissue Paper", None, 100, 150)).unwrap();
    assert_eq!(open(&dir).len(), 2);

    // The running store never rereads, so its next write wins
    server.add(line(5, "Logo Stickers", None, 25, 18)).unwrap();
    let ids: Vec<_> = open(&dir).list().into_iter().map(|i| i.id.to_string()).collect();
    assert_eq!(ids, ["7-12oz", "5-default"]);
}

#[test]
fn test_record_layout_on_disk() {
    let dir = TempDir::new().unwrap();
    let cart = open(&dir);
    cart.add(line(7, "Custom Paper Cups", Some("12oz"), 500, 248)).unwrap();

    let text = std::fs::read_to_string(dir.path().join("pbs-cart.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["version"], 0);
    let item = &json["state"]["items"][0];
    assert_eq!(item["id"], "7-12oz");
    assert_eq!(item["productId"], 7);
    assert_eq!(item["qtyLabel"], "500 units");
    assert_eq!(item["unitPrice"], "2.48");
}

#[test]
fn test_reads_record_with_numeric_amounts() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("pbs-cart.json"),
        r#"{"state":{"items":[
            {"id":"7-12oz","productId":7,"name":"Custom Paper Cups","category":"cups",
             "size":"12oz","qtyLabel":"251–500 units","qty":375,"unitPrice":0.48,"lineTotal":180}
        ]},"version":0}"#,
    )
    .unwrap();

    let cart = open(&dir);
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.summary().total, Decimal::from(180));
}

#[test]
fn test_corrupt_record_starts_empty_and_is_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pbs-cart.json");
    std::fs::write(&path, "{\"state\":{\"items\":[{\"id\":\"\"}]}").unwrap();

    let cart = open(&dir);
    assert!(cart.is_empty());

    cart.add(line(5, "Logo Stickers", None, 25, 30)).unwrap();
    assert_eq!(open(&dir).len(), 1);
}

#[test]
fn test_inconsistent_line_total_is_corrupt() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("pbs-cart.json"),
        r#"{"state":{"items":[
            {"id":"3-default","productId":3,"name":"Tissue","category":"tissue",
             "size":"Standard","qtyLabel":"1–50 units","qty":25,"unitPrice":"1.50","lineTotal":"99.00"}
        ]},"version":0}"#,
    )
    .unwrap();

    assert!(open(&dir).is_empty());
}
