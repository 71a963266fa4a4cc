use crate::legacy::value::{Dict, LegacyValue};
use std::cell::RefCell;
use std::rc::Rc;

/// Deepest container nesting accepted in source text and in the extracted mapping.
pub const MAX_NESTING_DEPTH: usize = 200;

pub type SharedList = Rc<RefCell<Vec<Object>>>;
pub type SharedDict = Rc<RefCell<Dict<Object>>>;

/// A value while the legacy file is being evaluated.
///
/// Lists and dicts are shared: binding one to a second name, storing it in a
/// container or passing it to `update` hands out the same object, so a later
/// `+=`, item assignment or `update` is visible through every reference.
/// [`Object::freeze`] takes the plain [`LegacyValue`] snapshot once evaluation is done.
#[derive(Debug, Clone)]
pub enum Object {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(SharedList),
    Tuple(Vec<Object>),
    Dict(SharedDict),
}

impl Object {
    pub fn list(items: Vec<Object>) -> Self {
        Object::List(Rc::new(RefCell::new(items)))
    }

    pub fn dict(dict: Dict<Object>) -> Self {
        Object::Dict(Rc::new(RefCell::new(dict)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::None => "NoneType",
            Object::Bool(_) => "bool",
            Object::Int(_) => "int",
            Object::Float(_) => "float",
            Object::Str(_) => "str",
            Object::List(_) => "list",
            Object::Tuple(_) => "tuple",
            Object::Dict(_) => "dict",
        }
    }

    /// The dict key for this object, or `None` if it is unhashable.
    pub fn to_key(&self) -> Option<LegacyValue> {
        Some(match self {
            Object::None => LegacyValue::None,
            Object::Bool(value) => LegacyValue::Bool(*value),
            Object::Int(value) => LegacyValue::Int(*value),
            Object::Float(value) => LegacyValue::Float(*value),
            Object::Str(value) => LegacyValue::Str(value.clone()),
            Object::Tuple(items) => LegacyValue::Tuple(
                items.iter().map(Object::to_key).collect::<Option<Vec<_>>>()?,
            ),
            Object::List(_) | Object::Dict(_) => return None,
        })
    }

    /// Snapshot with all sharing resolved. Returns `None` when containers nest
    /// deeper than [`MAX_NESTING_DEPTH`], which includes any container that
    /// contains itself.
    pub fn freeze(&self) -> Option<LegacyValue> {
        self.freeze_at(0)
    }

    fn freeze_at(&self, depth: usize) -> Option<LegacyValue> {
        if depth > MAX_NESTING_DEPTH {
            return None;
        }
        Some(match self {
            Object::List(items) => LegacyValue::List(freeze_items(&items.borrow(), depth)?),
            Object::Tuple(items) => LegacyValue::Tuple(freeze_items(items, depth)?),
            Object::Dict(dict) => LegacyValue::Dict(freeze_dict(dict, depth)?),
            scalar => scalar.to_key()?,
        })
    }
}

fn freeze_items(items: &[Object], depth: usize) -> Option<Vec<LegacyValue>> {
    items.iter().map(|item| item.freeze_at(depth + 1)).collect()
}

fn freeze_dict(dict: &SharedDict, depth: usize) -> Option<Dict> {
    dict.borrow()
        .iter()
        .map(|(key, value)| Some((key.clone(), value.freeze_at(depth + 1)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(value: &str) -> Object {
        Object::Str(value.to_string())
    }

    #[test]
    fn shared_list_is_seen_through_every_reference() {
        let flags = Object::list(vec![string("-a")]);
        let holder = Object::dict(
            [(LegacyValue::Str("F".to_string()), flags.clone())]
                .into_iter()
                .collect(),
        );
        if let Object::List(items) = &flags {
            items.borrow_mut().push(string("-b"));
        }
        assert_eq!(
            holder.freeze().map(|value| value.to_string()).as_deref(),
            Some("{'F': ['-a', '-b']}")
        );
    }

    #[test]
    fn keys_of_unhashable_objects() {
        assert_eq!(string("a").to_key(), Some(LegacyValue::Str("a".to_string())));
        assert_eq!(
            Object::Tuple(vec![Object::Int(1), Object::Bool(true)]).to_key(),
            Some(LegacyValue::Tuple(vec![LegacyValue::Int(1), LegacyValue::Bool(true)]))
        );
        assert_eq!(Object::list(vec![]).to_key(), None);
        assert_eq!(Object::Tuple(vec![Object::dict(Dict::new())]).to_key(), None);
    }

    #[test]
    fn self_containing_list_does_not_freeze() {
        let list = Object::list(vec![]);
        if let Object::List(items) = &list {
            items.borrow_mut().push(list.clone());
        }
        assert_eq!(list.freeze(), None);
    }

    #[test]
    fn nesting_limit() {
        let mut value = Object::Int(0);
        for _ in 0..MAX_NESTING_DEPTH {
            value = Object::list(vec![value]);
        }
        assert!(value.freeze().is_some());
        assert_eq!(Object::list(vec![value]).freeze(), None);
    }
}
