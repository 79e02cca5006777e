//! Grouped short flags: `-xy` as shorthand for `-x -y`.

use std::sync::{Arc, Mutex};

use crate::node::{Children, ParserNode};
use crate::{lock, DefaultAction, ParseError, Parser, PathSegment};

/// Expands grouped short flags over its flag children.
///
/// For a token `-xy` every character after the short prefix must resolve to a
/// [`crate::Flag`] child by alias; the group then parses each member flag in
/// turn and consumes one token. If any character fails to resolve, the token
/// is offered unchanged to the children at the current position instead, so
/// non-grouped aliases registered below the expander still match. A bare `-`
/// is never treated as a group.
pub struct MultiFlag {
    children: Children,
    default_action: Mutex<Option<DefaultAction>>,
    short_prefix: char,
    stop_token: Mutex<Option<String>>,
}

impl MultiFlag {
    pub fn new() -> Self {
        Self {
            children: Children::new(),
            default_action: Mutex::new(None),
            short_prefix: '-',
            stop_token: Mutex::new(Some("--".to_string())),
        }
    }

    pub fn short_prefix(mut self, prefix: char) -> Self {
        self.short_prefix = prefix;
        self
    }

    pub fn stop_token(self, token: impl Into<String>) -> Self {
        *lock(&self.stop_token) = Some(token.into());
        self
    }

    pub fn no_stop_token(self) -> Self {
        *lock(&self.stop_token) = None;
        self
    }

    pub fn child(self, parser: Arc<dyn Parser>) -> Self {
        self.children.append(parser);
        self
    }

    pub fn set_stop_token(&self, token: Option<String>) {
        *lock(&self.stop_token) = token;
    }

    /// The flag child matching `alias`, if the group can resolve it.
    fn resolve(children: &[Arc<dyn Parser>], alias: &str) -> Option<Arc<dyn Parser>> {
        children
            .iter()
            .find(|child| {
                child
                    .as_flag()
                    .is_some_and(|flag| flag.aliases().iter().any(|a| a == alias))
            })
            .cloned()
    }
}

impl Default for MultiFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for MultiFlag {
    fn parse(
        &self,
        arguments: &[String],
        index: usize,
        path: &[PathSegment],
    ) -> Result<usize, ParseError> {
        let arg = &arguments[index];
        if lock(&self.stop_token).as_deref() == Some(arg.as_str()) {
            tracing::debug!(token = %arg, "hit stop token");
            return Ok(0);
        }

        let mut child_path = path.to_vec();
        child_path.push(PathSegment::MultiFlag(self.short_prefix));
        let children = self.children.snapshot();

        if let Some(rest) = arg.strip_prefix(self.short_prefix) {
            if !rest.is_empty() {
                let mut group = Vec::new();
                for c in rest.chars() {
                    let alias = format!("{}{}", self.short_prefix, c);
                    match Self::resolve(&children, &alias) {
                        Some(flag) => group.push((flag, alias)),
                        None => {
                            tracing::debug!(token = %arg, alias = %alias, "not a flag group");
                            group.clear();
                            break;
                        }
                    }
                }
                if !group.is_empty() {
                    tracing::debug!(token = %arg, flags = group.len(), "expanding flag group");
                    for (flag, alias) in group {
                        // Each member sees the argument list with the group
                        // token replaced by its own alias, so error indices
                        // still point at the original position.
                        let mut synthetic: Vec<String> = arguments[..index].to_vec();
                        synthetic.push(alias);
                        flag.parse(&synthetic, index, &child_path)?;
                    }
                    return Ok(1);
                }
            }
        }

        for child in &children {
            let consumed = child.parse(arguments, index, &child_path)?;
            if consumed > 0 {
                return Ok(consumed);
            }
        }
        Ok(0)
    }

    fn descriptions(&self) -> Vec<(String, String)> {
        self.children.descriptions()
    }
}

impl ParserNode for MultiFlag {
    fn children(&self) -> &Children {
        &self.children
    }

    fn default_action(&self) -> Option<DefaultAction> {
        lock(&self.default_action).clone()
    }

    fn set_default_action(&self, action: Option<DefaultAction>) {
        *lock(&self.default_action) = action;
    }
}
