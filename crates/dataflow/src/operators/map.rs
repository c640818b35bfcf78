//! Map view: the multiset image of the parent under a transform.
//!
//! Duplicates are preserved: two parent records with equal images contribute
//! two copies. Select and scalar are maps with canned transforms.

use crate::bag::Bag;
use crate::handle::Multiset;
use crate::node::{MapperFn, Outcome};
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use rill_core::{EquivRef, Value};

/// Applies the transform to the parent's current contents.
pub(crate) fn seed(parent: &Multiset, mapper: &MapperFn, eq: &EquivRef) -> Bag {
    let records = parent.contents().iter().map(|e| mapper(e)).collect();
    Bag::from_records(records, eq.clone())
}

pub(crate) fn on_insert(mapper: &MapperFn, record: &Value) -> Option<Outcome> {
    Some(Outcome::Insert(mapper(record)))
}

/// A parent delete implies the image was present, so deleting one copy equal
/// to the image is always correct.
pub(crate) fn on_delete(mapper: &MapperFn, record: &Value) -> Option<Outcome> {
    Some(Outcome::Delete(mapper(record)))
}

/// Transform projecting each record onto the named fields.
pub(crate) fn project_fields(fields: &[&str]) -> MapperFn {
    let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
    Box::new(move |record: &Value| {
        let names: Vec<&str> = fields.iter().map(String::as_str).collect();
        record.project(&names)
    })
}

/// Transform extracting a single field, Null when absent.
pub(crate) fn extract_field(field: &str) -> MapperFn {
    let field = field.to_string();
    Box::new(move |record: &Value| record.extract(&field))
}
