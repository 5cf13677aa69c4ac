//! Decoding of raw response documents into typed records.
//!
//! The service answers with one flat JSON object per record. A base record
//! type and each extension field set declare only the keys they care about,
//! so a composite record is built by decoding the *same* raw value once per
//! field set and merging the results. Tuples of [`Extract`] types are such
//! composites:
//!
//! ```
//! use cinder_volumes::extract::Extract;
//! use cinder_volumes::volumes::{Volume, VolumeHostExt, VolumeTenantExt};
//!
//! let raw = serde_json::json!({
//!     "id": "289da7f8",
//!     "os-vol-tenant-attr:tenant_id": "304dc009",
//! });
//! let (volume, tenant, host) =
//!     <(Volume, VolumeTenantExt, VolumeHostExt)>::extract(&raw).unwrap();
//! assert_eq!(volume.id, "289da7f8");
//! assert_eq!(tenant.tenant_id, "304dc009");
//! assert_eq!(host.host, "");
//! ```
//!
//! Extraction writes into a caller-supplied [`Destination`]. The destination
//! is checked for addressability before the body is looked at.

use std::any::type_name;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;

use crate::error::VolumeError;

/// A field set that can build itself from a shared raw document.
pub trait Extract: Sized {
    /// Decodes `raw` into `Self`. Keys the type does not know are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::Decode`] when `raw` has the wrong shape.
    fn extract(raw: &Value) -> Result<Self, VolumeError>;
}

/// Implements [`Extract`] for types that deserialize from a JSON object.
///
/// ```
/// use cinder_volumes::impl_extract;
///
/// #[derive(serde::Deserialize)]
/// struct MigrationExt {
///     #[serde(rename = "os-vol-mig-status-attr:migstat", default)]
///     migration_status: Option<String>,
/// }
///
/// impl_extract!(MigrationExt);
/// ```
#[macro_export]
macro_rules! impl_extract {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::extract::Extract for $ty {
                fn extract(
                    raw: &::serde_json::Value,
                ) -> ::core::result::Result<Self, $crate::error::VolumeError> {
                    $crate::extract::from_value::<Self>(raw)
                }
            }
        )+
    };
}

/// Deserializes a JSON object; support function for [`impl_extract!`].
#[doc(hidden)]
pub fn from_value<T>(raw: &Value) -> Result<T, VolumeError>
where
    T: serde::de::DeserializeOwned,
{
    if !raw.is_object() {
        return Err(VolumeError::Decode {
            context: type_name::<T>().to_owned(),
            message: format!("expected a JSON object, found {}", kind(raw)),
        });
    }
    <T as serde::Deserialize>::deserialize(raw).map_err(|err| VolumeError::decode(type_name::<T>(), err))
}

const fn kind(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<T: Extract> Extract for Vec<T> {
    fn extract(raw: &Value) -> Result<Self, VolumeError> {
        match raw {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items.iter().map(T::extract).collect(),
            other => Err(VolumeError::Decode {
                context: type_name::<Self>().to_owned(),
                message: format!("expected an array, found {}", kind(other)),
            }),
        }
    }
}

macro_rules! impl_extract_tuple {
    ($($name:ident),+) => {
        impl<$($name: Extract),+> Extract for ($($name,)+) {
            fn extract(raw: &Value) -> Result<Self, VolumeError> {
                Ok(($($name::extract(raw)?,)+))
            }
        }
    };
}

impl_extract_tuple!(A, B);
impl_extract_tuple!(A, B, C);
impl_extract_tuple!(A, B, C, D);

/// A location extraction may write into.
///
/// `&mut T` is always addressable. Shared handles are addressable only while
/// no other handle aliases them; writing through an aliased handle would
/// mutate a value other owners consider immutable.
pub trait Destination {
    /// Type decoded into the destination.
    type Target: Extract;

    /// Returns the writable slot, or `None` when the destination is not
    /// addressable.
    fn slot(&mut self) -> Option<&mut Self::Target>;
}

impl<T: Extract> Destination for &mut T {
    type Target = T;

    fn slot(&mut self) -> Option<&mut T> {
        Some(&mut **self)
    }
}

impl<T: Extract> Destination for &mut Arc<T> {
    type Target = T;

    fn slot(&mut self) -> Option<&mut T> {
        Arc::get_mut(self)
    }
}

impl<T: Extract> Destination for &mut Rc<T> {
    type Target = T;

    fn slot(&mut self) -> Option<&mut T> {
        Rc::get_mut(self)
    }
}

/// Decodes the value under `envelope` in `body` into `dest`.
///
/// # Errors
///
/// Returns [`VolumeError::InvalidDestination`] when `dest` is not
/// addressable, whatever `body` holds, and [`VolumeError::Decode`] when the
/// envelope is missing or malformed.
pub fn extract_into<D: Destination>(
    body: &Value,
    envelope: &str,
    mut dest: D,
) -> Result<(), VolumeError> {
    let Some(slot) = dest.slot() else {
        return Err(VolumeError::InvalidDestination {
            target: type_name::<D>(),
        });
    };
    let raw = body.get(envelope).ok_or_else(|| VolumeError::Decode {
        context: envelope.to_owned(),
        message: format!("missing '{envelope}' in response body"),
    })?;
    *slot = D::Target::extract(raw)?;
    Ok(())
}
