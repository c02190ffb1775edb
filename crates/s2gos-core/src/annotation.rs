//! Type annotations of process parameters and return values.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use serde_json::Value;

/// Structural type of a parameter or return value.
///
/// This is the input language of schema inference. [`Annotation::Named`]
/// stands for an opaque type the engine knows nothing about and is always
/// rejected at registration time.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Any,
    None,
    Bool,
    Int,
    Float,
    Str,
    Date,
    DateTime,
    List(Box<Annotation>),
    Set(Box<Annotation>),
    /// Fixed-length tuple. Empty means a tuple of unknown shape.
    Tuple(Vec<Annotation>),
    Dict(Box<Annotation>, Box<Annotation>),
    Union(Vec<Annotation>),
    Literal(Vec<Value>),
    Named(String),
}

impl Annotation {
    /// `Union([inner, None])`.
    pub fn optional(inner: Annotation) -> Self {
        Annotation::Union(vec![inner, Annotation::None])
    }

    pub fn list(item: Annotation) -> Self {
        Annotation::List(Box::new(item))
    }

    pub fn set(item: Annotation) -> Self {
        Annotation::Set(Box::new(item))
    }

    pub fn dict(key: Annotation, value: Annotation) -> Self {
        Annotation::Dict(Box::new(key), Box::new(value))
    }

    pub fn literal<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Annotation::Literal(values.into_iter().map(Into::into).collect())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Annotation::Named(name.into())
    }

    /// Number of values a function with this return annotation produces.
    ///
    /// A non-empty tuple yields one value per member, anything else a single
    /// value.
    pub fn arity(&self) -> usize {
        match self {
            Annotation::Tuple(members) if !members.is_empty() => members.len(),
            _ => 1,
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Any => f.write_str("any"),
            Annotation::None => f.write_str("none"),
            Annotation::Bool => f.write_str("bool"),
            Annotation::Int => f.write_str("int"),
            Annotation::Float => f.write_str("float"),
            Annotation::Str => f.write_str("str"),
            Annotation::Date => f.write_str("date"),
            Annotation::DateTime => f.write_str("datetime"),
            Annotation::List(item) => write!(f, "list[{}]", item),
            Annotation::Set(item) => write!(f, "set[{}]", item),
            Annotation::Tuple(members) => {
                f.write_str("tuple[")?;
                write_joined(f, members, ", ")?;
                f.write_str("]")
            }
            Annotation::Dict(key, value) => write!(f, "dict[{}, {}]", key, value),
            Annotation::Union(members) => write_joined(f, members, " | "),
            Annotation::Literal(values) => {
                f.write_str("literal[")?;
                write_joined(f, values, ", ")?;
                f.write_str("]")
            }
            Annotation::Named(name) => f.write_str(name),
        }
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Rust types with a known [`Annotation`].
///
/// Implemented for the scalar, collection and date types a process function
/// can take as parameters or return. Opaque user types may implement it by
/// hand, typically returning [`Annotation::Any`] or a [`Annotation::Literal`].
pub trait TypeAnnotation {
    fn annotation() -> Annotation;
}

macro_rules! impl_type_annotation {
    ($annotation:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl TypeAnnotation for $ty {
                fn annotation() -> Annotation {
                    $annotation
                }
            }
        )+
    };
}

impl_type_annotation!(Annotation::Bool => bool);
impl_type_annotation!(
    Annotation::Int => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);
impl_type_annotation!(Annotation::Float => f32, f64);
impl_type_annotation!(Annotation::Str => String, str, char);
impl_type_annotation!(Annotation::None => ());
impl_type_annotation!(Annotation::Any => Value);
impl_type_annotation!(Annotation::Date => chrono::NaiveDate);
impl_type_annotation!(Annotation::DateTime => chrono::NaiveDateTime);

impl<Tz: chrono::TimeZone> TypeAnnotation for chrono::DateTime<Tz> {
    fn annotation() -> Annotation {
        Annotation::DateTime
    }
}

impl<T: TypeAnnotation + ?Sized> TypeAnnotation for &T {
    fn annotation() -> Annotation {
        T::annotation()
    }
}

impl<T: TypeAnnotation> TypeAnnotation for Option<T> {
    fn annotation() -> Annotation {
        Annotation::optional(T::annotation())
    }
}

impl<T: TypeAnnotation> TypeAnnotation for Vec<T> {
    fn annotation() -> Annotation {
        Annotation::list(T::annotation())
    }
}

impl<T: TypeAnnotation> TypeAnnotation for VecDeque<T> {
    fn annotation() -> Annotation {
        Annotation::list(T::annotation())
    }
}

impl<T: TypeAnnotation, const N: usize> TypeAnnotation for [T; N] {
    fn annotation() -> Annotation {
        Annotation::list(T::annotation())
    }
}

impl<T: TypeAnnotation, S> TypeAnnotation for HashSet<T, S> {
    fn annotation() -> Annotation {
        Annotation::set(T::annotation())
    }
}

impl<T: TypeAnnotation> TypeAnnotation for BTreeSet<T> {
    fn annotation() -> Annotation {
        Annotation::set(T::annotation())
    }
}

impl<K: TypeAnnotation, V: TypeAnnotation, S> TypeAnnotation for HashMap<K, V, S> {
    fn annotation() -> Annotation {
        Annotation::dict(K::annotation(), V::annotation())
    }
}

impl<K: TypeAnnotation, V: TypeAnnotation> TypeAnnotation for BTreeMap<K, V> {
    fn annotation() -> Annotation {
        Annotation::dict(K::annotation(), V::annotation())
    }
}

impl<K: TypeAnnotation, V: TypeAnnotation, S> TypeAnnotation for indexmap::IndexMap<K, V, S> {
    fn annotation() -> Annotation {
        Annotation::dict(K::annotation(), V::annotation())
    }
}

macro_rules! impl_tuple_annotation {
    ($($name:ident),+) => {
        impl<$($name: TypeAnnotation),+> TypeAnnotation for ($($name,)+) {
            fn annotation() -> Annotation {
                Annotation::Tuple(vec![$($name::annotation()),+])
            }
        }
    };
}

impl_tuple_annotation!(A);
impl_tuple_annotation!(A, B);
impl_tuple_annotation!(A, B, C);
impl_tuple_annotation!(A, B, C, D);
impl_tuple_annotation!(A, B, C, D, E);
impl_tuple_annotation!(A, B, C, D, E, F);
impl_tuple_annotation!(A, B, C, D, E, F, G);
impl_tuple_annotation!(A, B, C, D, E, F, G, H);
