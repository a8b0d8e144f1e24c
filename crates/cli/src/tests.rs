use super::*;
use std::sync::Mutex;
use toroid_interface::{Pos, diagnostics::InMemoryEmitter};

fn make_compiler(src: &str, args: &[&str]) -> (Compiler, Arc<Mutex<Vec<Diag>>>) {
    let opts = parse_args(["toroid", "prog.bf"].iter().chain(args).copied()).unwrap();
    let (emitter, diags) = InMemoryEmitter::new();
    let dcx = DiagCtxt::new(Box::new(emitter));
    let source = Arc::new(SourceFile::new("prog.bf", src));
    (Compiler { dcx, opts, source }, diags)
}

fn messages(diags: &Mutex<Vec<Diag>>) -> Vec<String> {
    diags.lock().unwrap().iter().map(|d| d.msg.clone()).collect()
}

#[test]
fn emits_llvm_ir_by_default() {
    let (compiler, diags) = make_compiler("52*,@", &[]);
    let ir = String::from_utf8(compiler.emit().unwrap()).unwrap();
    assert!(ir.starts_with("; ModuleID = 'toroid'"), "{ir}");
    assert!(ir.contains("define i32 @main() {"), "{ir}");
    assert!(ir.contains("declare i32 @putchar(i32)"), "{ir}");
    assert!(messages(&diags).is_empty());
}

#[test]
fn emit_kinds() {
    let (compiler, _) = make_compiler("1_@", &["--emit", "tree"]);
    let tree = toroid_flow::build(&Grid::with_default_size("1_@"));
    assert_eq!(compiler.emit().unwrap(), tree.to_string().into_bytes());

    let (compiler, _) = make_compiler("1_@", &["--emit", "mir", "--module-name", "m"]);
    let mir = String::from_utf8(compiler.emit().unwrap()).unwrap();
    assert!(mir.starts_with("module m {"), "{mir}");

    let (compiler, _) = make_compiler("1_@", &["--emit", "dot"]);
    let dot = String::from_utf8(compiler.emit().unwrap()).unwrap();
    assert!(dot.starts_with("digraph \"main\""), "{dot}");
}

#[test]
fn tree_does_not_need_codegen() {
    let (compiler, diags) = make_compiler("p@", &["--emit", "tree"]);
    assert!(compiler.emit().is_ok());
    assert!(messages(&diags).is_empty());
}

#[test]
fn runs_the_program() {
    let (compiler, _) = make_compiler("\"iH\",,55+,@", &["--run"]);
    assert_eq!(compiler.emit().unwrap(), b"Hi\n");
}

#[test]
fn reports_disallowed_instructions() {
    let (compiler, diags) = make_compiler("v\n>  p", &[]);
    assert!(compiler.emit().is_err());
    let diags = diags.lock().unwrap();
    assert_eq!(diags.len(), 1);
    let diag = &diags[0];
    assert!(diag.is_error());
    assert_eq!(diag.pos, Some(Pos::new(3, 1)));
    assert_eq!(diag.label.as_deref(), Some("grid access is not supported"));
    assert_eq!(diag.children.len(), 1);
}

#[test]
fn reports_unsupported_instructions() {
    let (compiler, diags) = make_compiler("&@", &["--run"]);
    assert!(compiler.emit().is_err());
    assert_eq!(messages(&diags), ["unsupported instruction `&` at (0, 0)"]);
    assert_eq!(compiler.dcx.err_count(), 1);
}

#[test]
fn out_of_fuel() {
    let (compiler, diags) = make_compiler("", &["--run", "--fuel", "10"]);
    assert!(compiler.emit().is_err());
    assert_eq!(messages(&diags), ["program failed: out of fuel after 10 steps"]);
}

#[test]
fn warns_about_oversized_programs() {
    let (compiler, diags) = make_compiler("52*,@ 9", &["--width", "5", "--run"]);
    assert_eq!(compiler.emit().unwrap(), [10]);
    let diags = diags.lock().unwrap();
    assert_eq!(diags.len(), 1);
    assert!(!diags[0].is_error());
    assert!(diags[0].msg.contains("5x25"), "{}", diags[0].msg);
}

#[test]
fn writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("prog.ll");
    let (compiler, _) = make_compiler("@", &["-o", out.to_str().unwrap()]);
    compiler.run_default().unwrap();
    let ir = fs::read_to_string(&out).unwrap();
    assert!(ir.contains("ret i32 0"), "{ir}");
}

#[test]
fn unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing").join("prog.ll");
    let (compiler, diags) = make_compiler("@", &["-o", out.to_str().unwrap()]);
    assert!(compiler.run_default().is_err());
    assert!(messages(&diags)[0].starts_with("couldn't write "));
}

#[test]
fn missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.bf");
    let opts = parse_args(["toroid", path.to_str().unwrap(), "--color", "never"]).unwrap();
    assert!(run_compiler_args(opts).is_err());
}

#[test]
fn compiles_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("prog.bf");
    let output = dir.path().join("prog.mir");
    fs::write(&input, "52*,@\n").unwrap();
    let args = [
        "toroid",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--emit",
        "mir",
        "--color",
        "never",
    ];
    run_compiler_args(parse_args(args).unwrap()).unwrap();
    assert!(fs::read_to_string(&output).unwrap().contains("call @putchar("));
}
