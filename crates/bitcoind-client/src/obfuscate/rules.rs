//! Per-method maskers referenced from the method table.
//!
//! Each request masker handles both calling conventions: positional
//! arguments by index and named arguments by key. Arguments that are not
//! present are left alone.

use serde_json::{Map, Value};

use super::MASK;
use crate::request::Params;

/// `dumpprivkey`: the whole result is the key.
pub fn mask_result(result: &mut Value) {
    *result = Value::String(MASK.to_owned());
}

/// `encryptwallet`, `walletpassphrase`.
pub fn mask_passphrase(params: &mut Params) {
    match params {
        Params::Positional(list) => mask_index(list, 0),
        Params::Named(map) => mask_key(map, "passphrase"),
    }
}

/// `walletpassphrasechange`.
pub fn mask_passphrase_change(params: &mut Params) {
    match params {
        Params::Positional(list) => {
            mask_index(list, 0);
            mask_index(list, 1);
        }
        Params::Named(map) => {
            mask_key(map, "oldpassphrase");
            mask_key(map, "newpassphrase");
        }
    }
}

/// `importprivkey`: positional calls are collapsed to a single mask, hiding
/// the label and rescan flag along with the key.
pub fn mask_imported_private_key(params: &mut Params) {
    match params {
        Params::Positional(list) => *list = vec![Value::String(MASK.to_owned())],
        Params::Named(map) => mask_key(map, "privkey"),
    }
}

/// `signmessagewithprivkey`.
pub fn mask_signing_private_key(params: &mut Params) {
    match params {
        Params::Positional(list) => mask_index(list, 0),
        Params::Named(map) => mask_key(map, "privkey"),
    }
}

/// `sethdseed`.
pub fn mask_hd_seed(params: &mut Params) {
    match params {
        Params::Positional(list) => mask_index(list, 1),
        Params::Named(map) => mask_key(map, "seed"),
    }
}

/// `signrawtransaction`: keys are the third argument.
pub fn mask_legacy_signing_keys(params: &mut Params) {
    match params {
        Params::Positional(list) => list.get_mut(2).into_iter().for_each(mask_each),
        Params::Named(map) => map.get_mut("privkeys").into_iter().for_each(mask_each),
    }
}

/// `signrawtransactionwithkey`: keys are the second argument.
pub fn mask_signing_keys(params: &mut Params) {
    match params {
        Params::Positional(list) => list.get_mut(1).into_iter().for_each(mask_each),
        Params::Named(map) => map.get_mut("privkeys").into_iter().for_each(mask_each),
    }
}

/// `importmulti`: every request's `keys` array.
pub fn mask_import_multi_keys(params: &mut Params) {
    let requests = match params {
        Params::Positional(list) => list.get_mut(0),
        Params::Named(map) => map.get_mut("requests"),
    };
    let Some(Value::Array(requests)) = requests else {
        return;
    };
    for request in requests {
        if let Some(keys) = request.get_mut("keys") {
            mask_each(keys);
        }
    }
}

fn mask_index(list: &mut [Value], index: usize) {
    if let Some(value) = list.get_mut(index) {
        *value = Value::String(MASK.to_owned());
    }
}

fn mask_key(map: &mut Map<String, Value>, key: &str) {
    if let Some(value) = map.get_mut(key) {
        *value = Value::String(MASK.to_owned());
    }
}

fn mask_each(value: &mut Value) {
    if let Value::Array(items) = value {
        for item in items {
            *item = Value::String(MASK.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn named(value: Value) -> Params {
        match value {
            Value::Object(map) => Params::Named(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn passphrase_change_masks_both_passphrases() {
        let mut params = Params::Positional(vec![json!("old"), json!("new")]);
        mask_passphrase_change(&mut params);
        assert_eq!(params, Params::Positional(vec![json!(MASK), json!(MASK)]));

        let mut params = named(json!({ "oldpassphrase": "old", "newpassphrase": "new" }));
        mask_passphrase_change(&mut params);
        assert_eq!(
            params,
            named(json!({ "oldpassphrase": MASK, "newpassphrase": MASK }))
        );
    }

    #[test]
    fn hd_seed_is_second_argument() {
        let mut params = Params::Positional(vec![json!(true), json!("cVseed")]);
        mask_hd_seed(&mut params);
        assert_eq!(params, Params::Positional(vec![json!(true), json!(MASK)]));
    }

    #[test]
    fn missing_arguments_are_left_alone() {
        let mut params = Params::Positional(Vec::new());
        mask_passphrase(&mut params);
        assert_eq!(params, Params::Positional(Vec::new()));

        let mut params = named(json!({ "hexstring": "00" }));
        mask_signing_keys(&mut params);
        assert_eq!(params, named(json!({ "hexstring": "00" })));
    }

    #[test]
    fn import_multi_masks_keys_of_every_request() {
        let mut params = named(json!({
            "requests": [
                { "address": "a", "keys": ["k1", "k2"] },
                { "address": "b" }
            ]
        }));
        mask_import_multi_keys(&mut params);
        assert_eq!(
            params,
            named(json!({
                "requests": [
                    { "address": "a", "keys": [MASK, MASK] },
                    { "address": "b" }
                ]
            }))
        );
    }

    #[test]
    fn result_is_replaced() {
        let mut result = json!("cVkey");
        mask_result(&mut result);
        assert_eq!(result, json!(MASK));
    }
}
