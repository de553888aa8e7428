//! Browser tests, run with `wasm-pack test --headless --firefox wasm`
#![cfg(target_arch = "wasm32")]

use bakery_backoffice_wasm::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn shop_today_is_a_valid_date() {
    let today = shop_today(7).unwrap();
    assert!(is_valid_report_date(&today));
}

#[wasm_bindgen_test]
fn shop_today_rejects_bad_offset() {
    assert!(shop_today(48).is_err());
}

#[wasm_bindgen_test]
fn invalid_ingredient_json_is_an_error() {
    assert!(calculate_stock_summary("{").is_err());
    assert!(is_ingredient_out_of_stock(r#"{"initialQuantity": 0}"#).unwrap());
}
