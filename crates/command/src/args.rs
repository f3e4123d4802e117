//! Typed command arguments.
//!
//! Each argument position of a command declares an [`ArgKind`]; parsing
//! goes through a fixed kind-to-parser table and fails per argument with
//! a structured [`ArgError`] naming the offending position, never with an
//! exception crossing the dispatch boundary.

use virtmenu_protocol::ViewerId;

use crate::table::Resolver;

/// Kinds an argument position can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Text,
    Int,
    Long,
    Float,
    /// Looked up against the online viewers.
    Viewer,
    /// Looked up against the registered menus.
    Menu,
}

/// A parsed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Int(i32),
    Long(i64),
    Float(f64),
    Viewer(ViewerId),
    /// A validated menu name; fetch the definition from the registry.
    Menu(String),
}

impl ArgValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            ArgValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            ArgValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ArgValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_viewer(&self) -> Option<ViewerId> {
        match self {
            ArgValue::Viewer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_menu(&self) -> Option<&str> {
        match self {
            ArgValue::Menu(s) => Some(s),
            _ => None,
        }
    }
}

/// Why an argument failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArgReason {
    #[error("is not an integer")]
    NotAnInteger,
    #[error("is not a long integer")]
    NotALong,
    #[error("is not a number")]
    NotANumber,
    #[error("does not match any online player")]
    UnknownViewer,
    #[error("does not match any menu")]
    UnknownMenu,
}

/// A per-argument parse failure: which position, what was given, why.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("argument {} ('{raw}') {reason}", .index + 1)]
pub struct ArgError {
    pub index: usize,
    pub raw: String,
    pub reason: ArgReason,
}

impl ArgKind {
    /// Parses one raw argument at `index` against this kind.
    pub fn parse(
        self,
        index: usize,
        raw: &str,
        resolver: &dyn Resolver,
    ) -> Result<ArgValue, ArgError> {
        let fail = |reason| ArgError {
            index,
            raw: raw.to_string(),
            reason,
        };
        match self {
            ArgKind::Text => Ok(ArgValue::Text(raw.to_string())),
            ArgKind::Int => raw
                .parse::<i32>()
                .map(ArgValue::Int)
                .map_err(|_| fail(ArgReason::NotAnInteger)),
            ArgKind::Long => raw
                .parse::<i64>()
                .map(ArgValue::Long)
                .map_err(|_| fail(ArgReason::NotALong)),
            ArgKind::Float => raw
                .parse::<f64>()
                .map(ArgValue::Float)
                .map_err(|_| fail(ArgReason::NotANumber)),
            ArgKind::Viewer => resolver
                .find_viewer(raw)
                .map(ArgValue::Viewer)
                .ok_or_else(|| fail(ArgReason::UnknownViewer)),
            ArgKind::Menu => {
                if resolver.has_menu(raw) {
                    Ok(ArgValue::Menu(raw.to_string()))
                } else {
                    Err(fail(ArgReason::UnknownMenu))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Sender;

    struct FixedResolver {
        viewer: ViewerId,
    }

    impl Resolver for FixedResolver {
        fn find_viewer(&self, name: &str) -> Option<ViewerId> {
            (name == "alice").then_some(self.viewer)
        }

        fn has_menu(&self, name: &str) -> bool {
            name == "shop"
        }

        fn message(&self, _sender: &Sender, _text: &str) {}

        fn sender_has_permission(&self, _sender: &Sender, _node: &str) -> bool {
            true
        }
    }

    fn resolver() -> FixedResolver {
        FixedResolver {
            viewer: ViewerId::random(),
        }
    }

    #[test]
    fn text_always_parses() {
        let r = resolver();
        let v = ArgKind::Text.parse(0, "anything at all", &r).unwrap();
        assert_eq!(v.as_text(), Some("anything at all"));
    }

    #[test]
    fn numeric_kinds_parse_and_fail() {
        let r = resolver();
        assert_eq!(ArgKind::Int.parse(0, "42", &r).unwrap().as_int(), Some(42));
        assert_eq!(
            ArgKind::Long.parse(0, "-7", &r).unwrap().as_long(),
            Some(-7)
        );
        assert_eq!(
            ArgKind::Float.parse(0, "2.5", &r).unwrap().as_float(),
            Some(2.5)
        );

        let err = ArgKind::Int.parse(2, "abc", &r).unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.reason, ArgReason::NotAnInteger);
        assert_eq!(err.to_string(), "argument 3 ('abc') is not an integer");

        assert_eq!(
            ArgKind::Long.parse(0, "1.5", &r).unwrap_err().reason,
            ArgReason::NotALong
        );
        assert_eq!(
            ArgKind::Float.parse(0, "x", &r).unwrap_err().reason,
            ArgReason::NotANumber
        );
    }

    #[test]
    fn viewer_lookup() {
        let r = resolver();
        let v = ArgKind::Viewer.parse(0, "alice", &r).unwrap();
        assert_eq!(v.as_viewer(), Some(r.viewer));

        let err = ArgKind::Viewer.parse(1, "bob", &r).unwrap_err();
        assert_eq!(err.reason, ArgReason::UnknownViewer);
        assert_eq!(
            err.to_string(),
            "argument 2 ('bob') does not match any online player"
        );
    }

    #[test]
    fn menu_lookup() {
        let r = resolver();
        let v = ArgKind::Menu.parse(0, "shop", &r).unwrap();
        assert_eq!(v.as_menu(), Some("shop"));

        let err = ArgKind::Menu.parse(0, "void", &r).unwrap_err();
        assert_eq!(err.reason, ArgReason::UnknownMenu);
    }
}
