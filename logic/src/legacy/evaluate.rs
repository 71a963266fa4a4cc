use crate::legacy::object::{Object, SharedDict};
use crate::legacy::parse_legacy::{
    BinaryOperator, Expression, ExpressionKind, Identifier, Module, Statement, Target,
};
use crate::legacy::source_error::{SourceError, SourceResult, Span};
use crate::legacy::value::{Dict, LegacyValue};
use std::collections::HashMap;
use std::rc::Rc;
use um_env_base::logging::debug;

/// Longest string or sequence that `+`, `+=` and `*` may build.
const MAX_SEQUENCE_LENGTH: usize = 1 << 24;

/// Names bound by evaluating one legacy definition file. Created fresh per load
/// and dropped once the needed binding has been taken out.
#[derive(Debug, Default)]
pub struct Namespace {
    bindings: HashMap<String, Object>,
}

impl Namespace {
    pub fn get(&self, name: &str) -> Option<&Object> {
        self.bindings.get(name)
    }

    /// Snapshot of a binding, see [`Object::freeze`].
    pub fn value(&self, name: &str) -> Option<LegacyValue> {
        self.get(name)?.freeze()
    }

    pub fn take(mut self, name: &str) -> Option<Object> {
        self.bindings.remove(name)
    }

    fn bind(&mut self, name: &str, object: Object) {
        debug!("Binding '{name}' to a {}", object.type_name());
        self.bindings.insert(name.to_string(), object);
    }

    fn lookup(&self, identifier: &str, span: &Span) -> SourceResult<&Object> {
        self.bindings
            .get(identifier)
            .ok_or_else(|| undefined_name(identifier, span))
    }
}

fn undefined_name(identifier: &str, span: &Span) -> SourceError {
    SourceError::evaluation(
        format!("name '{identifier}' is not defined"),
        span.clone(),
        "undefined name",
    )
}

pub fn evaluate_module(module: &Module) -> SourceResult<Namespace> {
    let mut namespace = Namespace::default();
    for statement in &module.statements {
        execute_statement(&mut namespace, statement)?;
    }
    Ok(namespace)
}

fn execute_statement(namespace: &mut Namespace, statement: &Statement) -> SourceResult<()> {
    match statement {
        Statement::Assign { targets, value } => {
            let value = evaluate(namespace, value)?;
            for target in targets {
                assign(namespace, target, value.clone())?;
            }
        }
        Statement::AugmentedAdd {
            target,
            value,
            span,
        } => {
            let current = match target {
                Target::Name(identifier) => {
                    namespace.lookup(&identifier.name, &identifier.span)?.clone()
                }
                Target::Subscript { name, key, span } => {
                    let container = namespace.lookup(&name.name, &name.span)?;
                    let key = evaluate(namespace, key)?;
                    subscript(container, &key, span)?
                }
            };
            let value = evaluate(namespace, value)?;
            let combined = add_in_place(current, value, span)?;
            assign(namespace, target, combined)?;
        }
        Statement::Update {
            name,
            argument,
            span,
        } => {
            let dict = match namespace.lookup(&name.name, &name.span)? {
                Object::Dict(dict) => Rc::clone(dict),
                other => {
                    return Err(SourceError::evaluation(
                        format!("'{}' object has no attribute 'update'", other.type_name()),
                        name.span.clone(),
                        "not a dict",
                    ));
                }
            };
            let entries = match evaluate(namespace, argument)? {
                Object::Dict(update) => dict_entries(&update),
                other => {
                    return Err(SourceError::evaluation(
                        format!(
                            "update() argument must be a dict, not '{}'",
                            other.type_name()
                        ),
                        span.clone(),
                        "update call",
                    ));
                }
            };
            let mut dict = dict.borrow_mut();
            for (key, value) in entries {
                dict.insert(key, value);
            }
        }
        Statement::Import { span } => {
            debug!("Skipping import statement at {span:?}");
        }
        Statement::Expression(expression) => {
            evaluate(namespace, expression)?;
        }
    }
    Ok(())
}

/// Copies the entries out, so a dict can be updated with itself.
fn dict_entries(dict: &SharedDict) -> Vec<(LegacyValue, Object)> {
    dict.borrow()
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn assign(namespace: &mut Namespace, target: &Target, value: Object) -> SourceResult<()> {
    match target {
        Target::Name(Identifier { name, .. }) => {
            namespace.bind(name, value);
            Ok(())
        }
        Target::Subscript { name, key, span } => {
            let container = namespace.lookup(&name.name, &name.span)?;
            let key = evaluate(namespace, key)?;
            store_item(container, &key, value, span)
        }
    }
}

fn store_item(container: &Object, key: &Object, value: Object, span: &Span) -> SourceResult<()> {
    match container {
        Object::Dict(dict) => {
            let key = hashable_key(key, span)?;
            dict.borrow_mut().insert(key, value);
            Ok(())
        }
        Object::List(items) => {
            let mut items = items.borrow_mut();
            let index = resolve_index(key, items.len(), span)?;
            items[index] = value;
            Ok(())
        }
        other => Err(SourceError::evaluation(
            format!(
                "'{}' object does not support item assignment",
                other.type_name()
            ),
            span.clone(),
            "item assignment",
        )),
    }
}

/// `+=` extends a list in place; any other target is rebound to the sum.
fn add_in_place(current: Object, value: Object, span: &Span) -> SourceResult<Object> {
    let items = match current {
        Object::List(items) => items,
        current => return apply_binary(BinaryOperator::Add, current, value, span),
    };
    let more = match &value {
        Object::List(more) => more.borrow().clone(),
        Object::Tuple(more) => more.clone(),
        Object::Str(more) => more
            .chars()
            .map(|c| Object::Str(c.to_string()))
            .collect(),
        other => {
            return Err(SourceError::evaluation(
                format!("'{}' object is not iterable", other.type_name()),
                span.clone(),
                "list extension",
            ));
        }
    };
    let length = items.borrow().len().checked_add(more.len());
    check_length(length, span, "concatenated sequence is too large")?;
    items.borrow_mut().extend(more);
    Ok(Object::List(items))
}

pub fn evaluate(namespace: &Namespace, expression: &Expression) -> SourceResult<Object> {
    let span = &expression.span;
    Ok(match &expression.kind {
        ExpressionKind::None => Object::None,
        ExpressionKind::Bool(value) => Object::Bool(*value),
        ExpressionKind::Int(value) => Object::Int(*value),
        ExpressionKind::Float(value) => Object::Float(*value),
        ExpressionKind::Str(value) => Object::Str(value.clone()),
        ExpressionKind::Name(name) => namespace.lookup(name, span)?.clone(),
        ExpressionKind::List(items) => Object::list(evaluate_all(namespace, items)?),
        ExpressionKind::Tuple(items) => Object::Tuple(evaluate_all(namespace, items)?),
        ExpressionKind::Dict(entries) => {
            let mut dict = Dict::new();
            for (key_expression, value_expression) in entries {
                let key = evaluate(namespace, key_expression)?;
                let key = hashable_key(&key, &key_expression.span)?;
                dict.insert(key, evaluate(namespace, value_expression)?);
            }
            Object::dict(dict)
        }
        ExpressionKind::Negate(operand) => match evaluate(namespace, operand)? {
            Object::Int(value) => Object::Int(value.checked_neg().ok_or_else(|| overflow(span))?),
            Object::Bool(value) => Object::Int(-i64::from(value)),
            Object::Float(value) => Object::Float(-value),
            other => return Err(bad_unary_operand("-", &other, span)),
        },
        ExpressionKind::Plus(operand) => match evaluate(namespace, operand)? {
            Object::Bool(value) => Object::Int(i64::from(value)),
            value @ (Object::Int(_) | Object::Float(_)) => value,
            other => return Err(bad_unary_operand("+", &other, span)),
        },
        ExpressionKind::Binary {
            operator,
            left,
            right,
        } => {
            let left = evaluate(namespace, left)?;
            let right = evaluate(namespace, right)?;
            apply_binary(*operator, left, right, span)?
        }
        ExpressionKind::Subscript { value, key } => {
            let container = evaluate(namespace, value)?;
            let key = evaluate(namespace, key)?;
            subscript(&container, &key, span)?
        }
        ExpressionKind::MethodCall { method, .. } => {
            return Err(SourceError::unsupported(
                format!("method call '.{}()' is not supported here", method.name),
                span.clone(),
                "method call",
            )
            .with_help("Only 'name.update({...})' is supported, as a statement of its own"));
        }
    })
}

fn evaluate_all(namespace: &Namespace, items: &[Expression]) -> SourceResult<Vec<Object>> {
    items.iter().map(|item| evaluate(namespace, item)).collect()
}

fn as_int(value: &Object) -> Option<i64> {
    match value {
        Object::Int(value) => Some(*value),
        Object::Bool(value) => Some(i64::from(*value)),
        _ => None,
    }
}

fn as_float(value: &Object) -> Option<f64> {
    match value {
        Object::Float(value) => Some(*value),
        other => as_int(other).map(|value| value as f64),
    }
}

fn apply_binary(
    operator: BinaryOperator,
    left: Object,
    right: Object,
    span: &Span,
) -> SourceResult<Object> {
    if let (Some(left), Some(right)) = (as_int(&left), as_int(&right)) {
        let result = match operator {
            BinaryOperator::Add => left.checked_add(right),
            BinaryOperator::Subtract => left.checked_sub(right),
            BinaryOperator::Multiply => left.checked_mul(right),
        };
        return result.map(Object::Int).ok_or_else(|| overflow(span));
    }
    if let (Some(left), Some(right)) = (as_float(&left), as_float(&right)) {
        return Ok(Object::Float(match operator {
            BinaryOperator::Add => left + right,
            BinaryOperator::Subtract => left - right,
            BinaryOperator::Multiply => left * right,
        }));
    }
    let result = match (operator, left, right) {
        (BinaryOperator::Add, Object::Str(mut left), Object::Str(right)) => {
            check_concatenation(left.len(), right.len(), span)?;
            left.push_str(&right);
            Object::Str(left)
        }
        (BinaryOperator::Add, Object::List(left), Object::List(right)) => {
            let mut items = left.borrow().clone();
            let right = right.borrow();
            check_concatenation(items.len(), right.len(), span)?;
            items.extend(right.iter().cloned());
            Object::list(items)
        }
        (BinaryOperator::Add, Object::Tuple(mut left), Object::Tuple(right)) => {
            check_concatenation(left.len(), right.len(), span)?;
            left.extend(right);
            Object::Tuple(left)
        }
        (BinaryOperator::Multiply, sequence, count)
            if as_int(&count).is_some() && is_repeatable(&sequence) =>
        {
            repeat(sequence, as_int(&count).unwrap_or(0), span)?
        }
        (BinaryOperator::Multiply, count, sequence)
            if as_int(&count).is_some() && is_repeatable(&sequence) =>
        {
            repeat(sequence, as_int(&count).unwrap_or(0), span)?
        }
        (operator, left, right) => {
            return Err(SourceError::evaluation(
                format!(
                    "unsupported operand type(s) for {}: '{}' and '{}'",
                    operator.symbol(),
                    left.type_name(),
                    right.type_name()
                ),
                span.clone(),
                "invalid operands",
            ));
        }
    };
    Ok(result)
}

fn is_repeatable(value: &Object) -> bool {
    matches!(value, Object::Str(_) | Object::List(_) | Object::Tuple(_))
}

/// Repetition shares the repeated items, as `[[0]] * 2` holds the same inner list twice.
fn repeat(sequence: Object, count: i64, span: &Span) -> SourceResult<Object> {
    let count = usize::try_from(count).unwrap_or(0);
    Ok(match sequence {
        Object::Str(value) => {
            check_repetition(value.len(), count, span)?;
            Object::Str(value.repeat(count))
        }
        Object::List(items) => {
            let borrowed = items.borrow();
            Object::list(repeat_items(&borrowed, count, span)?)
        }
        Object::Tuple(items) => Object::Tuple(repeat_items(&items, count, span)?),
        other => other,
    })
}

fn repeat_items(items: &[Object], count: usize, span: &Span) -> SourceResult<Vec<Object>> {
    check_repetition(items.len(), count, span)?;
    if items.is_empty() {
        return Ok(vec![]);
    }
    let mut repeated = Vec::with_capacity(items.len() * count);
    for _ in 0..count {
        repeated.extend_from_slice(items);
    }
    Ok(repeated)
}

fn check_repetition(length: usize, count: usize, span: &Span) -> SourceResult<()> {
    check_length(
        length.checked_mul(count),
        span,
        "repeated sequence is too large",
    )
}

fn check_concatenation(left: usize, right: usize, span: &Span) -> SourceResult<()> {
    check_length(
        left.checked_add(right),
        span,
        "concatenated sequence is too large",
    )
}

fn check_length(length: Option<usize>, span: &Span, message: &str) -> SourceResult<()> {
    match length {
        Some(length) if length <= MAX_SEQUENCE_LENGTH => Ok(()),
        _ => Err(SourceError::evaluation(
            message,
            span.clone(),
            format!("longer than {MAX_SEQUENCE_LENGTH}"),
        )),
    }
}

fn subscript(container: &Object, key: &Object, span: &Span) -> SourceResult<Object> {
    match container {
        Object::Dict(dict) => {
            let key = hashable_key(key, span)?;
            let found = dict.borrow().get(&key).cloned();
            found.ok_or_else(|| {
                SourceError::evaluation(format!("key {key} not found"), span.clone(), "missing key")
            })
        }
        Object::List(items) => {
            let items = items.borrow();
            let index = resolve_index(key, items.len(), span)?;
            Ok(items[index].clone())
        }
        Object::Tuple(items) => {
            let index = resolve_index(key, items.len(), span)?;
            Ok(items[index].clone())
        }
        Object::Str(value) => {
            let chars: Vec<char> = value.chars().collect();
            let index = resolve_index(key, chars.len(), span)?;
            Ok(Object::Str(chars[index].to_string()))
        }
        other => Err(SourceError::evaluation(
            format!("'{}' object is not subscriptable", other.type_name()),
            span.clone(),
            "subscript",
        )),
    }
}

/// Resolves a possibly negative index against a sequence length.
fn resolve_index(key: &Object, length: usize, span: &Span) -> SourceResult<usize> {
    let Some(index) = as_int(key) else {
        return Err(SourceError::evaluation(
            format!("indices must be integers, not '{}'", key.type_name()),
            span.clone(),
            "index",
        ));
    };
    let resolved = if index < 0 {
        i64::try_from(length).ok().and_then(|length| length.checked_add(index))
    } else {
        Some(index)
    };
    resolved
        .and_then(|index| usize::try_from(index).ok())
        .filter(|index| *index < length)
        .ok_or_else(|| {
            SourceError::evaluation(
                format!("index {index} out of range"),
                span.clone(),
                "index",
            )
        })
}

fn hashable_key(key: &Object, span: &Span) -> SourceResult<LegacyValue> {
    key.to_key().ok_or_else(|| {
        SourceError::evaluation(
            format!("unhashable type: '{}'", key.type_name()),
            span.clone(),
            "dict key",
        )
    })
}

fn overflow(span: &Span) -> SourceError {
    SourceError::unsupported("integer overflow", span.clone(), "result does not fit into 64 bits")
}

fn bad_unary_operand(operator: &str, operand: &Object, span: &Span) -> SourceError {
    SourceError::evaluation(
        format!(
            "bad operand type for unary {operator}: '{}'",
            operand.type_name()
        ),
        span.clone(),
        "invalid operand",
    )
}
