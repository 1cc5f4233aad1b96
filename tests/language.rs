use std::fs;

use proptest::prelude::*;
use radcalc::{
    Calculator, Error, evaluate,
    interpreter::node::NodeKind,
    parse,
    storage::{FileStore, MemoryStore},
};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Runs every `tests/scripts/*.calc` transcript.
///
/// Each line is `input => expected result` or `input => ! expected error`.
/// Blank lines and lines starting with `#` are skipped. Lines of one file share
/// a calculator, so variables and saved profiles carry over.
#[test]
fn script_transcripts() {
    let mut count = 0;
    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/scripts");

    for entry in WalkDir::new(root).sort_by_file_name()
                                   .into_iter()
                                   .filter_map(Result::ok)
                                   .filter(|e| e.path().extension().is_some_and(|ext| ext == "calc"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let mut calculator = Calculator::new(MemoryStore::new());

        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let Some((input, expected)) = line.split_once("=>") else {
                panic!("{path:?}:{}: missing `=>`", number + 1);
            };
            count += 1;

            let (input, expected) = (input.trim(), expected.trim());
            let outcome = calculator.eval_line(input);
            match (expected.strip_prefix('!'), outcome) {
                (None, Ok(result)) => {
                    assert_eq!(result, expected, "{path:?}:{}: {input}", number + 1);
                },
                (Some(error), Err(e)) => {
                    assert_eq!(e.to_string(), error.trim(), "{path:?}:{}: {input}", number + 1);
                },
                (None, Err(e)) => panic!("{path:?}:{}: {input} failed: {e}", number + 1),
                (Some(_), Ok(result)) => {
                    panic!("{path:?}:{}: {input} returned {result} but should fail", number + 1)
                },
            }
        }
    }

    assert!(count > 0, "No transcripts found in {root}");
}

fn assert_result(src: &str, expected: &[&str]) {
    match evaluate(src) {
        Ok(results) => assert_eq!(results, expected, "{src}"),
        Err(e) => panic!("Script failed: {e}"),
    }
}

fn assert_failure(src: &str) {
    assert!(evaluate(src).is_err(), "Script succeeded but was expected to fail: {src}");
}

#[test]
fn mixed_radix_arithmetic() {
    assert_result("0x10 + 010 + b10 + 10", &["36"]);
    assert_result("hex(0x10 * 0x10)", &["0x100"]);
    assert_result("oct(0755 - 0700)", &["055"]);
    assert_result("bin(b1010 >> 1)", &["b101"]);
}

#[test]
fn wide_integers_render_in_their_radix() {
    assert_result("hex(1 << 60)", &["0x1000000000000000"]);
    let bits = format!("b1{}", "0".repeat(54));
    assert_result("bin(2 ** 54)", &[bits.as_str()]);
    assert_result("dec(0x1000000000000000)", &["1152921504606846976"]);
}

#[test]
fn variables_persist_between_lines() {
    assert_result("$a = 6\n$b = $a * 7\nhex($b)", &["6", "42", "0x2a"]);
    assert_result("$a = 1\nclear()\n", &["1", "Cleared state"]);
    assert_failure("$a = 1\nclear()\n$a");
}

#[test]
fn errors_are_reported_by_phase() {
    assert!(matches!(evaluate("1 +"), Err(Error::Parse(_))));
    assert!(matches!(evaluate("$nope"), Err(Error::Runtime(_))));
    assert_failure("save(x)y");
    assert_failure("1 = 1");
    assert_failure("(1 + 2");
}

#[test]
fn deeply_nested_lines_evaluate() {
    let depth = 10_000;
    let line = format!("hex({}0xff{})", "(".repeat(depth), ")".repeat(depth));
    assert_result(&line, &["0xff"]);
    assert_failure(&format!("{}1{}", "(".repeat(depth), ")".repeat(depth - 1)));
}

#[test]
fn profiles_survive_a_restart() {
    let dir = TempDir::new().unwrap();

    let mut first = Calculator::new(FileStore::new(dir.path()));
    first.eval_line("$mask = 0xff00").unwrap();
    first.eval_line("$shift = 8").unwrap();
    assert_eq!(first.eval_line("save(bits)").unwrap(), "Saved bits");

    let mut second = Calculator::with_profile(FileStore::new(dir.path()), "bits");
    assert_eq!(second.eval_line("hex($mask >> $shift)").unwrap(), "0xff");
    assert_eq!(second.eval_line("$mask").unwrap(), "0xff00");
}

#[test]
fn saving_fires_the_callback_with_the_profile_name() {
    let (sender, receiver) = std::sync::mpsc::channel();
    let mut calculator = Calculator::new(MemoryStore::new()).on_save(move |profile| {
                                                               let _ = sender.send(profile.to_string());
                                                           });
    calculator.eval_line("save(alpha)").unwrap();
    calculator.eval_line("save(beta)").unwrap();
    assert_eq!(receiver.try_iter().collect::<Vec<_>>(), ["alpha", "beta"]);
}

proptest! {
    #[test]
    fn evaluation_never_panics(input in r"[0-9a-fxbo$()+\-*/%<>\&|^\~=. ]{0,40}") {
        let mut calculator = Calculator::new(MemoryStore::new());
        let _ = calculator.eval_line(&input);
    }

    #[test]
    fn accepted_lines_have_balanced_parentheses(input in r"[0-9()+\-* ]{0,30}") {
        if let Ok(nodes) = parse(&input) {
            let opens = nodes.iter().filter(|n| n.kind() == NodeKind::LParen).count();
            let closes = nodes.iter().filter(|n| n.kind() == NodeKind::RParen).count();
            prop_assert_eq!(opens, closes);
            prop_assert_eq!(nodes.last().map(|n| n.kind()), Some(NodeKind::End));
        }
    }

    #[test]
    fn radix_output_relexes_in_the_same_system(value in -(1_i64 << 53)..(1_i64 << 53)) {
        for (keyword, prefix) in [("hex", "0x"), ("oct", "0"), ("bin", "b")] {
            let rendered = evaluate(&format!("{keyword}({value})")).unwrap().remove(0);
            prop_assert!(rendered.trim_start_matches('-').starts_with(prefix), "{}", rendered);
            let back = evaluate(&format!("dec({rendered})")).unwrap().remove(0);
            prop_assert_eq!(back, value.to_string());
        }
    }
}
