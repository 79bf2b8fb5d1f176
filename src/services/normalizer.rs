use serde_json::Value;

use crate::models::ShowRecord;

/// Turns a decoded `/shows/search/title` body into an ordered list of shows.
///
/// Three shapes are understood: a bare array, `{"result": [...]}` and
/// `{"shows": [...]}`. Anything else is treated as "no shows" rather than an
/// error. Array elements that are not objects are skipped.
pub fn normalize_shows(body: Value) -> Vec<ShowRecord> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut object) => match take_array(&mut object, "result")
            .or_else(|| take_array(&mut object, "shows"))
        {
            Some(items) => items,
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items.into_iter().filter_map(to_show_record).collect()
}

fn take_array(object: &mut serde_json::Map<String, Value>, field: &str) -> Option<Vec<Value>> {
    match object.remove(field) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    }
}

fn to_show_record(item: Value) -> Option<ShowRecord> {
    let Value::Object(mut object) = item else {
        return None;
    };

    match serde_json::from_value::<ShowRecord>(Value::Object(object.clone())) {
        Ok(show) => Some(show),
        Err(e) => {
            // Keep the show but without options it cannot match anything
            tracing::debug!(error = %e, "Unparseable streamingOptions, dropping them");
            object.shift_remove("streamingOptions");
            Some(ShowRecord {
                streaming_options: Default::default(),
                extra: object,
            })
        }
    }
}
