//! Pluggable record equality.
//!
//! Deletes typically arrive as freshly-deserialized payloads rather than the
//! originally-inserted record, so "remove one copy" has to compare structure,
//! not identity. The strategy is an explicit constructor parameter on every
//! multiset instead of ambient global state; `Structural` is the default.

use crate::value::Value;
use alloc::rc::Rc;

/// An equality strategy over records.
pub trait Equivalence {
    /// Returns true if `a` and `b` are to be treated as copies of the same
    /// record.
    fn eq(&self, a: &Value, b: &Value) -> bool;
}

/// Shared handle to an equality strategy.
pub type EquivRef = Rc<dyn Equivalence>;

/// Deep structural equality.
///
/// Objects compare by field set, arrays element-wise, floats by bit pattern
/// (so NaN matches itself and a delete payload carrying NaN can still find
/// its copy). Cross-type comparisons are false; Int(1) and Float(1.0) are
/// distinct records. Behavior on cyclic records is out of contract - `Value`
/// cannot express cycles.
#[derive(Clone, Copy, Debug, Default)]
pub struct Structural;

impl Structural {
    /// Returns a shared handle to the structural strategy.
    pub fn shared() -> EquivRef {
        Rc::new(Structural)
    }
}

impl Equivalence for Structural {
    fn eq(&self, a: &Value, b: &Value) -> bool {
        structural_eq(a, b)
    }
}

fn structural_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x.to_bits() == y.to_bits(),
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structural_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys)
                    .all(|((kx, vx), (ky, vy))| kx == ky && structural_eq(vx, vy))
        }
        _ => false,
    }
}
