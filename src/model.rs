//! Element model for an API snapshot
//!
//! A snapshot is a forest of packages; packages own classes, classes own
//! members and nested classes. Identity is the element name; the `link`
//! field is an opaque display reference and never participates in equality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Result, TimelineError};

/// Stability classification attached to an element
///
/// `Internal` elements are excluded from the snapshot tree at construction
/// and therefore never reach diffing or since-resolution. Stable elements
/// carry no status at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiStatus {
    Experimental,
    Internal,
    Obsolete,
}

/// The discriminator carried by every record in a snapshot document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Package,
    Class,
    Enum,
    Record,
    Interface,
    AnnotationType,
    TypeParameter,
    Constructor,
    Method,
    Field,
    EnumConstant,
    RecordComponent,
}

impl ElementKind {
    /// Parse the wire discriminator. Unknown values are a malformed document,
    /// handled by the caller; `None` here is not a recoverable skip.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "PACKAGE" => Some(Self::Package),
            "CLASS" => Some(Self::Class),
            "ENUM" => Some(Self::Enum),
            "RECORD" => Some(Self::Record),
            "INTERFACE" => Some(Self::Interface),
            "ANNOTATION_TYPE" => Some(Self::AnnotationType),
            "TYPE_PARAMETER" => Some(Self::TypeParameter),
            "CONSTRUCTOR" => Some(Self::Constructor),
            "METHOD" => Some(Self::Method),
            "FIELD" => Some(Self::Field),
            "ENUM_CONSTANT" => Some(Self::EnumConstant),
            "RECORD_COMPONENT" => Some(Self::RecordComponent),
            _ => None,
        }
    }

    /// Whether this kind produces a Class node
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Self::Class | Self::Enum | Self::Record | Self::Interface | Self::AnnotationType
        )
    }

    /// The member category for this kind, if it produces a Member node
    pub fn member_kind(&self) -> Option<MemberKind> {
        match self {
            Self::Constructor => Some(MemberKind::Constructor),
            Self::Method => Some(MemberKind::Method),
            Self::Field => Some(MemberKind::Field),
            Self::EnumConstant => Some(MemberKind::EnumConstant),
            Self::RecordComponent => Some(MemberKind::RecordComponent),
            _ => None,
        }
    }
}

/// The five member categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberKind {
    Constructor,
    Method,
    Field,
    EnumConstant,
    RecordComponent,
}

impl MemberKind {
    /// Wire spelling, matching the snapshot document discriminator
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constructor => "CONSTRUCTOR",
            Self::Method => "METHOD",
            Self::Field => "FIELD",
            Self::EnumConstant => "ENUM_CONSTANT",
            Self::RecordComponent => "RECORD_COMPONENT",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A package node: fully qualified name plus its directly declared classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Fully qualified package name (e.g. `org.bukkit`)
    pub name: String,
    /// Directly declared classes, in document order. Nested classes live
    /// under their enclosing class, not here.
    pub classes: Vec<Class>,
    pub api_status: Option<ApiStatus>,
    /// Opaque display reference, passed through unmodified
    pub link: Option<String>,
}

impl Package {
    pub fn new(name: impl Into<String>, api_status: Option<ApiStatus>, link: Option<String>) -> Self {
        Self {
            name: name.into(),
            classes: Vec::new(),
            api_status,
            link,
        }
    }
}

/// A class node: type name, members, and nested classes
///
/// Equality covers name, members, nested classes, status, and link; the
/// `owner` back-reference is for reporting only and is excluded.
#[derive(Debug, Clone)]
pub struct Class {
    /// Fully qualified type name, unique within a snapshot
    pub name: String,
    /// Declared members, in document order
    pub members: Vec<Member>,
    /// Nested classes, in document order
    pub inner_classes: Vec<Class>,
    pub api_status: Option<ApiStatus>,
    pub link: Option<String>,
    /// Name of the enclosing package or class. Read-only context, not an
    /// ownership edge.
    pub owner: String,
}

impl Class {
    pub fn new(
        name: impl Into<String>,
        api_status: Option<ApiStatus>,
        link: Option<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            inner_classes: Vec::new(),
            api_status,
            link,
            owner: owner.into(),
        }
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.members == other.members
            && self.inner_classes == other.inner_classes
            && self.api_status == other.api_status
            && self.link == other.link
    }
}

impl Eq for Class {}

/// A member node: constructor, method, field, enum constant, or record component
///
/// The name is the display name; for methods it already encodes the erased
/// parameter types (e.g. `foo(String,int)`) to disambiguate overloads.
/// Equality covers `(name, kind, params, api_status)` only.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    /// Parameter-type strings for constructors and methods; absent for
    /// fields and constants
    pub params: Option<Vec<String>>,
    pub api_status: Option<ApiStatus>,
    pub link: Option<String>,
    /// Name of the declaring class. Reporting context only, excluded from
    /// equality.
    pub declaring_class: String,
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.params == other.params
            && self.api_status == other.api_status
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.kind.hash(state);
        self.params.hash(state);
        self.api_status.hash(state);
    }
}

/// A constructed tree node, tagged by variant
///
/// `attach` is the single place that decides which parent/child combinations
/// are valid: Package←Class, Class←Class, Class←Member. Anything else is
/// malformed input.
#[derive(Debug, Clone)]
pub enum Element {
    Package(Package),
    Class(Class),
    Member(Member),
}

impl Element {
    pub fn name(&self) -> &str {
        match self {
            Self::Package(p) => &p.name,
            Self::Class(c) => &c.name,
            Self::Member(m) => &m.name,
        }
    }

    pub fn link(&self) -> Option<&str> {
        match self {
            Self::Package(p) => p.link.as_deref(),
            Self::Class(c) => c.link.as_deref(),
            Self::Member(m) => m.link.as_deref(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Package(_) => "package",
            Self::Class(_) => "class",
            Self::Member(_) => "member",
        }
    }

    /// Attach a child node, enforcing the valid combinations per parent tag
    pub fn attach(&mut self, child: Element) -> Result<()> {
        match (&mut *self, child) {
            (Self::Package(p), Self::Class(c)) => {
                p.classes.push(c);
                Ok(())
            }
            (Self::Class(k), Self::Class(c)) => {
                k.inner_classes.push(c);
                Ok(())
            }
            (Self::Class(k), Self::Member(m)) => {
                k.members.push(m);
                Ok(())
            }
            (parent, child) => Err(TimelineError::InvalidChild {
                parent_kind: parent.kind_name(),
                parent: parent.name().to_string(),
                child_kind: child.kind_name(),
                child: child.name().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, params: &[&str]) -> Member {
        Member {
            name: name.to_string(),
            kind: MemberKind::Method,
            params: Some(params.iter().map(|p| p.to_string()).collect()),
            api_status: None,
            link: None,
            declaring_class: "org.bukkit.Server".to_string(),
        }
    }

    #[test]
    fn test_member_equality_ignores_link_and_owner() {
        let mut a = method("getName()", &[]);
        let mut b = method("getName()", &[]);
        a.link = Some("a.html".to_string());
        b.link = Some("b.html".to_string());
        b.declaring_class = "org.bukkit.World".to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn test_member_equality_covers_each_field() {
        let base = method("setSeed(long)", &["long"]);

        let mut renamed = base.clone();
        renamed.name = "setSeed(int)".to_string();
        assert_ne!(base, renamed);

        let mut rekinded = base.clone();
        rekinded.kind = MemberKind::Field;
        assert_ne!(base, rekinded);

        let mut reparamed = base.clone();
        reparamed.params = Some(vec!["int".to_string()]);
        assert_ne!(base, reparamed);

        let mut restatused = base.clone();
        restatused.api_status = Some(ApiStatus::Obsolete);
        assert_ne!(base, restatused);
    }

    #[test]
    fn test_class_equality_ignores_owner() {
        let mut a = Class::new("org.bukkit.Server", None, None, "org.bukkit");
        let mut b = Class::new("org.bukkit.Server", None, None, "somewhere.else");
        a.members.push(method("getName()", &[]));
        b.members.push(method("getName()", &[]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_attach_valid_combinations() {
        let mut pkg = Element::Package(Package::new("org.bukkit", None, None));
        let class = Class::new("org.bukkit.Server", None, None, "org.bukkit");
        pkg.attach(Element::Class(class)).unwrap();

        let mut class = Element::Class(Class::new("org.bukkit.Server", None, None, "org.bukkit"));
        class
            .attach(Element::Class(Class::new(
                "org.bukkit.Server.Spigot",
                None,
                None,
                "org.bukkit.Server",
            )))
            .unwrap();
        class.attach(Element::Member(method("getName()", &[]))).unwrap();
    }

    #[test]
    fn test_attach_rejects_member_under_package() {
        let mut pkg = Element::Package(Package::new("org.bukkit", None, None));
        let err = pkg.attach(Element::Member(method("getName()", &[]))).unwrap_err();
        assert!(err.to_string().contains("cannot attach"));
    }

    #[test]
    fn test_attach_rejects_nested_package() {
        let mut pkg = Element::Package(Package::new("org.bukkit", None, None));
        let err = pkg
            .attach(Element::Package(Package::new("org.bukkit.entity", None, None)))
            .unwrap_err();
        assert!(err.to_string().contains("package"));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(ElementKind::parse("PACKAGE"), Some(ElementKind::Package));
        assert_eq!(ElementKind::parse("ANNOTATION_TYPE"), Some(ElementKind::AnnotationType));
        assert_eq!(ElementKind::parse("ENUM_CONSTANT"), Some(ElementKind::EnumConstant));
        assert_eq!(ElementKind::parse("MODULE"), None);
        assert!(ElementKind::parse("RECORD").unwrap().is_type());
        assert_eq!(
            ElementKind::parse("CONSTRUCTOR").unwrap().member_kind(),
            Some(MemberKind::Constructor)
        );
    }
}
