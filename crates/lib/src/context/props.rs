//! Typed property bag shared by every task in a build.

use std::collections::HashMap;
use std::path::PathBuf;

use super::version::BuildVersion;

/// Well-known property keys.
///
/// Tasks only read or write shared state through these keys (or keys the
/// script explicitly hands them, such as a run-program output property).
pub mod keys {
  pub const PRODUCT_ID: &str = "ProductId";
  pub const PRODUCT_NAME: &str = "ProductName";
  pub const PRODUCT_ROOT_DIR: &str = "ProductRootDir";
  pub const COMPANY_NAME: &str = "CompanyName";
  pub const COMPANY_COPYRIGHT: &str = "CompanyCopyright";
  pub const COMPANY_TRADEMARK: &str = "CompanyTrademark";
  pub const BUILD_CONFIGURATION: &str = "BuildConfiguration";
  pub const BUILD_VERSION: &str = "BuildVersion";
  pub const INFORMATIONAL_VERSION: &str = "InformationalVersion";
  pub const PRODUCT_VERSION_FIELD_COUNT: &str = "ProductVersionFieldCount";
  pub const AUTO_ASSEMBLY_VERSION: &str = "AutoAssemblyVersion";
  pub const OS_PLATFORM: &str = "OsPlatform";
  pub const DOTNET_EXECUTABLE: &str = "DotnetExecutable";
}

/// A value stored in the property bag.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
  String(String),
  Bool(bool),
  Int(i64),
  Version(BuildVersion),
  Path(PathBuf),
  List(Vec<String>),
}

impl From<&str> for PropertyValue {
  fn from(value: &str) -> Self {
    Self::String(value.to_string())
  }
}

impl From<String> for PropertyValue {
  fn from(value: String) -> Self {
    Self::String(value)
  }
}

impl From<bool> for PropertyValue {
  fn from(value: bool) -> Self {
    Self::Bool(value)
  }
}

impl From<i64> for PropertyValue {
  fn from(value: i64) -> Self {
    Self::Int(value)
  }
}

impl From<BuildVersion> for PropertyValue {
  fn from(value: BuildVersion) -> Self {
    Self::Version(value)
  }
}

impl From<PathBuf> for PropertyValue {
  fn from(value: PathBuf) -> Self {
    Self::Path(value)
  }
}

impl From<Vec<String>> for PropertyValue {
  fn from(value: Vec<String>) -> Self {
    Self::List(value)
  }
}

/// Conversion out of a [`PropertyValue`].
///
/// Returns `None` when the stored value cannot represent `Self`; callers then
/// fall back to their default.
pub trait FromProperty: Sized {
  fn from_property(value: &PropertyValue) -> Option<Self>;
}

impl FromProperty for String {
  fn from_property(value: &PropertyValue) -> Option<Self> {
    match value {
      PropertyValue::String(s) => Some(s.clone()),
      PropertyValue::Bool(b) => Some(b.to_string()),
      PropertyValue::Int(i) => Some(i.to_string()),
      PropertyValue::Version(v) => Some(v.to_string()),
      PropertyValue::Path(p) => Some(p.display().to_string()),
      PropertyValue::List(_) => None,
    }
  }
}

impl FromProperty for bool {
  fn from_property(value: &PropertyValue) -> Option<Self> {
    match value {
      PropertyValue::Bool(b) => Some(*b),
      PropertyValue::String(s) => s.trim().parse().ok(),
      _ => None,
    }
  }
}

impl FromProperty for i64 {
  fn from_property(value: &PropertyValue) -> Option<Self> {
    match value {
      PropertyValue::Int(i) => Some(*i),
      PropertyValue::String(s) => s.trim().parse().ok(),
      _ => None,
    }
  }
}

impl FromProperty for usize {
  fn from_property(value: &PropertyValue) -> Option<Self> {
    i64::from_property(value).and_then(|i| usize::try_from(i).ok())
  }
}

impl FromProperty for BuildVersion {
  fn from_property(value: &PropertyValue) -> Option<Self> {
    match value {
      PropertyValue::Version(v) => Some(*v),
      PropertyValue::String(s) => s.parse().ok(),
      _ => None,
    }
  }
}

impl FromProperty for PathBuf {
  fn from_property(value: &PropertyValue) -> Option<Self> {
    match value {
      PropertyValue::Path(p) => Some(p.clone()),
      PropertyValue::String(s) => Some(PathBuf::from(s)),
      _ => None,
    }
  }
}

impl FromProperty for Vec<String> {
  fn from_property(value: &PropertyValue) -> Option<Self> {
    match value {
      PropertyValue::List(items) => Some(items.clone()),
      PropertyValue::String(s) => Some(vec![s.clone()]),
      _ => None,
    }
  }
}

/// Mapping from key to typed value. Grows during a build, never shrinks.
#[derive(Debug, Clone, Default)]
pub struct PropertyBag {
  values: HashMap<String, PropertyValue>,
}

impl PropertyBag {
  pub fn new() -> Self {
    Self::default()
  }

  /// Overwrite the value stored under `key`.
  pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
    self.values.insert(key.into(), value.into());
  }

  /// The value under `key` converted to `T`, or `None` if absent or of another type.
  pub fn try_get<T: FromProperty>(&self, key: &str) -> Option<T> {
    self.values.get(key).and_then(T::from_property)
  }

  /// The value under `key`, or `default` if absent or of another type.
  pub fn get_or<T: FromProperty>(&self, key: &str, default: T) -> T {
    self.try_get(key).unwrap_or(default)
  }

  pub fn contains(&self, key: &str) -> bool {
    self.values.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
    self.values.iter().map(|(k, v)| (k.as_str(), v))
  }
}
