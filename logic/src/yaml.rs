mod emitter;
mod scalar;

use crate::adapter::Adapter;
use crate::legacy::EnvironmentMapping;
use crate::types::FilePath;
use std::io::Write;
use um_env_base::result::{Context, UmEnvResult};

/// Block-style YAML, keys in mapping order. Strings that a YAML 1.1 or 1.2
/// reader would load as anything but a string are quoted.
pub fn mapping_to_yaml(mapping: &EnvironmentMapping) -> String {
    emitter::BlockEmitter::emit(mapping)
}

pub fn write_yaml(
    adapter: &dyn Adapter,
    mapping: &EnvironmentMapping,
    output_path: &FilePath,
) -> UmEnvResult<()> {
    let yaml = mapping_to_yaml(mapping);
    (|| -> UmEnvResult<()> {
        let mut file = adapter.create_file(output_path)?;
        file.write_all(yaml.as_bytes())?;
        file.flush()?;
        Ok(())
    })()
    .with_context(|| format!("Failed to write YAML file '{}'", output_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::{Dict, LegacyValue, load_mapping};
    use crate::mock_adapter::MockAdapter;
    use expect_test::{Expect, expect};

    fn string(value: &str) -> LegacyValue {
        LegacyValue::Str(value.to_string())
    }

    fn test_yaml(entries: Vec<(&str, LegacyValue)>, expected: Expect) {
        let dict = entries
            .into_iter()
            .map(|(key, value)| (string(key), value))
            .collect::<Dict>();
        let mapping = EnvironmentMapping::try_from_dict(dict).unwrap();
        expected.assert_eq(&mapping_to_yaml(&mapping));
    }

    fn load_yaml(source: &str) -> String {
        let adapter = MockAdapter::new();
        adapter.set_file("um_env.py", source);
        let mapping = load_mapping(&adapter, &FilePath::from("um_env.py")).unwrap();
        mapping_to_yaml(&mapping)
    }

    #[test]
    fn scenario_keeps_order_and_uses_block_sequences() {
        test_yaml(
            vec![
                ("UM_START_DATE", string("19600101")),
                ("UM_NPES", LegacyValue::Int(16)),
                ("UM_FLAGS", LegacyValue::List(vec![string("-d"), string("-v")])),
            ],
            expect![[r#"
                UM_START_DATE: '19600101'
                UM_NPES: 16
                UM_FLAGS:
                - -d
                - -v
            "#]],
        );
    }

    #[test]
    fn keys_are_not_sorted() {
        test_yaml(
            vec![
                ("ZETA", LegacyValue::Int(1)),
                ("ALPHA", LegacyValue::Int(2)),
                ("MU", LegacyValue::Int(3)),
            ],
            expect![[r#"
                ZETA: 1
                ALPHA: 2
                MU: 3
            "#]],
        );
    }

    #[test]
    fn scalars() {
        test_yaml(
            vec![
                ("NONE", LegacyValue::None),
                ("FLAG", LegacyValue::Bool(true)),
                ("RATIO", LegacyValue::Float(0.5)),
                ("NEGATIVE", LegacyValue::Int(-3)),
                ("BOOL_STRING", string("true")),
                ("PATH", string("/g/data/access")),
            ],
            expect![[r#"
                NONE: null
                FLAG: true
                RATIO: 0.5
                NEGATIVE: -3
                BOOL_STRING: 'true'
                PATH: /g/data/access
            "#]],
        );
    }

    #[test]
    fn tuples_and_empty_collections() {
        test_yaml(
            vec![
                (
                    "LAYOUT",
                    LegacyValue::Tuple(vec![LegacyValue::Int(4), LegacyValue::Int(8)]),
                ),
                ("NOTHING", LegacyValue::List(vec![])),
                ("EMPTY", LegacyValue::Dict(Dict::new())),
            ],
            expect![[r#"
                LAYOUT:
                - 4
                - 8
                NOTHING: []
                EMPTY: {}
            "#]],
        );
    }

    #[test]
    fn nested_dict_is_indented() {
        let inner = [(string("B"), LegacyValue::Int(1))]
            .into_iter()
            .collect::<Dict>();
        test_yaml(
            vec![("A", LegacyValue::Dict(inner))],
            expect![[r#"
                A:
                  B: 1
            "#]],
        );
    }

    #[test]
    fn strings_read_as_other_types_in_yaml_1_1_are_quoted() {
        test_yaml(
            vec![
                ("A", string("on")),
                ("B", string("yes")),
                ("C", string("12:30")),
                ("D", string("1_000")),
                ("E", string("off")),
                ("G", string("NO")),
                ("H", string("0x1F")),
                ("I", string("1.5")),
                ("J", string("~")),
                ("K", string("2001-12-14")),
            ],
            expect![[r#"
                A: 'on'
                B: 'yes'
                C: '12:30'
                D: '1_000'
                E: 'off'
                G: 'NO'
                H: '0x1F'
                I: '1.5'
                J: '~'
                K: '2001-12-14'
            "#]],
        );
    }

    #[test]
    fn floats() {
        test_yaml(
            vec![
                ("WHOLE", LegacyValue::Float(3.0)),
                ("LARGE", LegacyValue::Float(1e20)),
                ("SMALL", LegacyValue::Float(1.5e-7)),
                ("INFINITE", LegacyValue::Float(f64::NEG_INFINITY)),
            ],
            expect![[r#"
                WHOLE: 3.0
                LARGE: 1.0e+20
                SMALL: 1.5e-7
                INFINITE: -.inf
            "#]],
        );
    }

    #[test]
    fn aliased_containers_are_written_with_final_contents() {
        expect![[r#"
            UM_FLAGS:
            - -a
            - -b
            COUPLING:
              OCEAN: 'on'
              ICE: 'off'
            ALSO_FLAGS:
            - -a
            - -b
        "#]]
        .assert_eq(&load_yaml(
            "flags = ['-a']\n\
             coupling = {'OCEAN': 'on'}\n\
             vars = {'UM_FLAGS': flags, 'COUPLING': coupling}\n\
             vars['ALSO_FLAGS'] = flags\n\
             flags += ['-b']\n\
             coupling.update({'ICE': 'off'})\n",
        ));
    }

    #[test]
    fn output_reads_back_as_the_same_values() {
        let nested = [
            (LegacyValue::Int(1), string("one")),
            (string("yes"), LegacyValue::Bool(false)),
        ]
        .into_iter()
        .collect::<Dict>();
        let dict = [
            ("DATE", string("19600101")),
            ("SWITCH", string("on")),
            ("CLOCK", string("12:30")),
            ("COUNT", LegacyValue::Int(-16)),
            ("RATIO", LegacyValue::Float(1e20)),
            ("NOTHING", LegacyValue::None),
            ("TEXT", string("two\nlines: 'quoted' # not a comment")),
            (
                "LIST",
                LegacyValue::List(vec![
                    string("a,b"),
                    LegacyValue::List(vec![string("[x]"), LegacyValue::Bool(true)]),
                    LegacyValue::Dict(nested.clone()),
                ]),
            ),
            ("NESTED", LegacyValue::Dict(nested)),
        ]
        .into_iter()
        .map(|(key, value)| (string(key), value))
        .collect::<Dict>();
        let mapping = EnvironmentMapping::try_from_dict(dict).unwrap();
        let yaml = mapping_to_yaml(&mapping);
        let read_back = serde_yaml::from_str::<serde_yaml::Value>(&yaml).unwrap();
        assert_eq!(read_back, serde_yaml::to_value(&mapping).unwrap());
    }

    #[test]
    fn empty_mapping() {
        test_yaml(vec![], expect![[r#"
            {}
        "#]]);
    }

    #[test]
    fn write_replaces_existing_content() {
        let adapter = MockAdapter::new();
        adapter.set_file("um_env.yaml", "OLD: content\nMORE: lines\n");
        let mapping = EnvironmentMapping::try_from_dict(
            [(string("NEW"), LegacyValue::Int(1))].into_iter().collect(),
        )
        .unwrap();
        write_yaml(&adapter, &mapping, &FilePath::from("um_env.yaml")).unwrap();
        assert_eq!(adapter.get_file("um_env.yaml").as_deref(), Some("NEW: 1\n"));
        adapter.verify_effects(expect![[r#"
            CREATE FILE: um_env.yaml
        "#]]);
    }

    #[test]
    fn write_failure_names_output_path() {
        let adapter = MockAdapter::new();
        adapter.set_read_only("locked/um_env.yaml");
        let error = write_yaml(
            &adapter,
            &EnvironmentMapping::default(),
            &FilePath::from("locked/um_env.yaml"),
        )
        .unwrap_err();
        expect!["Failed to write YAML file 'locked/um_env.yaml'"].assert_eq(&error.to_string());
        assert_eq!(adapter.get_file("locked/um_env.yaml"), None);
    }
}
