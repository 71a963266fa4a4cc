use crate::legacy::{Dict, EnvironmentMapping, LegacyValue};
use crate::yaml::scalar::{Context, render_scalar, render_string};

const INDENT: usize = 2;

/// Block-style YAML laid out like `yaml.dump(..., default_flow_style=False)`:
/// sequences under a mapping key are not indented, nested mappings are
/// indented by two spaces, and empty collections are written as `[]`/`{}`.
#[derive(Debug, Default)]
pub struct BlockEmitter {
    output: String,
}

impl BlockEmitter {
    pub fn emit(mapping: &EnvironmentMapping) -> String {
        let mut emitter = BlockEmitter::default();
        if mapping.is_empty() {
            emitter.output.push_str("{}\n");
        } else {
            emitter.write_entries(
                0,
                mapping
                    .iter()
                    .map(|(key, value)| (render_string(key, Context::Block), value)),
                false,
            );
        }
        emitter.output
    }

    /// With `inline` set, the first entry continues the current line after `- `.
    fn write_entries<'a>(
        &mut self,
        indent: usize,
        entries: impl Iterator<Item = (String, &'a LegacyValue)>,
        inline: bool,
    ) {
        for (index, (key, value)) in entries.enumerate() {
            if index > 0 || !inline {
                self.pad(indent);
            }
            self.output.push_str(&key);
            self.output.push(':');
            match value {
                LegacyValue::List(items) | LegacyValue::Tuple(items) if !items.is_empty() => {
                    self.output.push('\n');
                    self.write_sequence(indent, items, false);
                }
                LegacyValue::Dict(dict) if !dict.is_empty() => {
                    self.output.push('\n');
                    self.write_entries(indent + INDENT, dict_entries(dict), false);
                }
                scalar => {
                    self.output.push(' ');
                    self.write_scalar(scalar);
                }
            }
        }
    }

    fn write_sequence(&mut self, indent: usize, items: &[LegacyValue], inline: bool) {
        for (index, item) in items.iter().enumerate() {
            if index > 0 || !inline {
                self.pad(indent);
            }
            self.output.push_str("- ");
            match item {
                LegacyValue::List(items) | LegacyValue::Tuple(items) if !items.is_empty() => {
                    self.write_sequence(indent + INDENT, items, true);
                }
                LegacyValue::Dict(dict) if !dict.is_empty() => {
                    self.write_entries(indent + INDENT, dict_entries(dict), true);
                }
                scalar => self.write_scalar(scalar),
            }
        }
    }

    fn write_scalar(&mut self, value: &LegacyValue) {
        self.output.push_str(&render_scalar(value, Context::Block));
        self.output.push('\n');
    }

    fn pad(&mut self, indent: usize) {
        self.output.extend(std::iter::repeat_n(' ', indent));
    }
}

/// Nested keys may be any hashable value; tuples become flow sequences.
fn dict_entries(dict: &Dict) -> impl Iterator<Item = (String, &LegacyValue)> {
    dict.iter()
        .map(|(key, value)| (render_scalar(key, Context::Block), value))
}
