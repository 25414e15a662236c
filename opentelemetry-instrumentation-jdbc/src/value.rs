use std::fmt::{self, Write as _};

/// A value bound to a prepared statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// SQL `NULL`.
    Null,
    /// A boolean.
    Bool(bool),
    /// Any integer type.
    Int(i64),
    /// Any floating point type.
    Float(f64),
    /// Character data. The only kind rendered with quotes.
    Text(String),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Any other value, already converted to its string form (dates,
    /// decimals, streams).
    Other(String),
}

impl ParameterValue {
    /// Writes the value the way it appears in a rendered parameter list.
    pub(crate) fn write_rendered(&self, out: &mut String) {
        match self {
            ParameterValue::Text(text) => {
                out.push('\'');
                out.push_str(text);
                out.push('\'');
            }
            other => {
                let _ = write!(out, "{other}");
            }
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Null => f.write_str("null"),
            ParameterValue::Bool(value) => write!(f, "{value}"),
            ParameterValue::Int(value) => write!(f, "{value}"),
            ParameterValue::Float(value) => write!(f, "{value:?}"),
            ParameterValue::Text(value) | ParameterValue::Other(value) => f.write_str(value),
            ParameterValue::Bytes(bytes) => {
                f.write_str("0x")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

macro_rules! from_integer {
    ($($t:ty),+) => {
        $(
            impl From<$t> for ParameterValue {
                fn from(value: $t) -> Self {
                    ParameterValue::Int(i64::from(value))
                }
            }
        )+
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<f32> for ParameterValue {
    fn from(value: f32) -> Self {
        ParameterValue::Float(f64::from(value))
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::Text(value)
    }
}

impl From<Vec<u8>> for ParameterValue {
    fn from(value: Vec<u8>) -> Self {
        ParameterValue::Bytes(value)
    }
}

impl From<&[u8]> for ParameterValue {
    fn from(value: &[u8]) -> Self {
        ParameterValue::Bytes(value.to_vec())
    }
}

impl<T: Into<ParameterValue>> From<Option<T>> for ParameterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParameterValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(value: impl Into<ParameterValue>) -> String {
        let mut out = String::new();
        value.into().write_rendered(&mut out);
        out
    }

    #[test]
    fn only_text_is_quoted() {
        assert_eq!(rendered("x"), "'x'");
        assert_eq!(rendered(ParameterValue::Other("2024-01-31".into())), "2024-01-31");
        assert_eq!(rendered(5), "5");
        assert_eq!(rendered(true), "true");
    }

    #[test]
    fn special_values() {
        assert_eq!(rendered(None::<i32>), "null");
        assert_eq!(rendered(1.0), "1.0");
        assert_eq!(rendered(vec![0xde_u8, 0xad, 0x01]), "0xdead01");
        assert_eq!(rendered(Some("y")), "'y'");
    }
}
