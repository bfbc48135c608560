//! End-to-end test: parser output JSON -> lossless tree -> migration -> text

use std::path::Path;
use std::sync::Arc;

use naoshi_core::{Migration, from_parser_output};
use naoshi_migrations::ArrayRefInForeachMigration;
use serde_json::{Value, json};

fn token(kind: &str, text: &str, trailing_ws: usize) -> Value {
    let trailing = if trailing_ws == 0 {
        json!([])
    } else {
        json!([{ "kind": "whitespace", "width": trailing_ws }])
    };
    json!({
        "kind": "token",
        "token": { "kind": kind, "width": text.len(), "leading": [], "trailing": trailing }
    })
}

fn variable(name: &str, trailing_ws: usize) -> Value {
    json!({ "kind": "variable", "variable_expression": token("variable", name, trailing_ws) })
}

/// Parser output for `foreach ($xs as &$x) { echo $x; }\n`.
fn parser_output() -> Value {
    let source = "foreach ($xs as &$x) { echo $x; }\n";
    let foreach = json!({
        "kind": "foreach_statement",
        "foreach_keyword": token("foreach", "foreach", 1),
        "foreach_left_paren": token("left_paren", "(", 0),
        "foreach_collection": variable("$xs", 1),
        "foreach_await_keyword": { "kind": "missing" },
        "foreach_as": token("as", "as", 1),
        "foreach_key": { "kind": "missing" },
        "foreach_arrow": { "kind": "missing" },
        "foreach_value": {
            "kind": "prefix_unary_expression",
            "prefix_unary_operator": token("ampersand", "&", 0),
            "prefix_unary_operand": variable("$x", 0)
        },
        "foreach_right_paren": token("right_paren", ")", 1),
        "foreach_body": {
            "kind": "compound_statement",
            "compound_left_brace": token("left_brace", "{", 1),
            "compound_statements": {
                "kind": "list",
                "elements": [{
                    "kind": "echo_statement",
                    "echo_keyword": token("echo", "echo", 1),
                    "echo_expressions": variable("$x", 0),
                    "echo_semicolon": token("semicolon", ";", 1)
                }]
            },
            "compound_right_brace": {
                "kind": "token",
                "token": {
                    "kind": "right_brace",
                    "width": 1,
                    "leading": [],
                    "trailing": [{ "kind": "end_of_line", "width": 1 }]
                }
            }
        }
    });
    json!({
        "program_text": source,
        "parse_tree": {
            "kind": "script",
            "script_declarations": {
                "kind": "list",
                "elements": [foreach, token("end_of_file", "", 0)]
            }
        }
    })
}

#[test]
fn parsed_tree_round_trips_the_source() {
    let result = from_parser_output(Path::new("sample.php"), &parser_output()).unwrap();
    assert_eq!(result.root().full_text(), result.source());
}

#[test]
fn migrating_a_parsed_file_rewrites_the_loop_and_keeps_formatting() {
    let result = from_parser_output(Path::new("sample.php"), &parser_output()).unwrap();

    let migrated = ArrayRefInForeachMigration.migrate(result.root());
    assert_eq!(
        migrated.full_text(),
        "foreach (array_keys($xs) as $x_key) { echo $xs[$x_key]; }\n"
    );

    // A second run finds nothing left to rewrite.
    let again = ArrayRefInForeachMigration.migrate(&migrated);
    assert!(Arc::ptr_eq(&migrated, &again));
}
