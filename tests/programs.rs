use std::fs;

use ivrit::error::{ErrorKind, IvritError};
use ivrit::interpreter::io::BufferedIo;
use ivrit::interpreter::{Interpreter, RunOptions, Termination};
use ivrit::preprocessor::preprocess;
use ivrit::source::{SourceLoader, SourceProgram, TextLoader};
use pretty_assertions::assert_eq;

const QUIET: RunOptions = RunOptions {
    announce: false,
    dump_variables: false,
};

fn run_with_input(source: &str, inputs: &[&str]) -> (ivrit::Result<Termination>, Vec<String>) {
    let program = TextLoader::new(source).load().unwrap();
    let preprocessed = preprocess(program).unwrap();
    let io = BufferedIo::with_inputs(inputs.iter().copied());
    let mut interpreter = Interpreter::new(preprocessed, io).unwrap().with_options(QUIET);

    let result = interpreter.run();
    (result, interpreter.into_io().output().to_vec())
}

fn run(source: &str) -> Vec<String> {
    let (result, output) = run_with_input(source, &[]);
    result.unwrap_or_else(|e| panic!("program failed: {}\n{}", e, source));
    output
}

fn run_err(source: &str) -> IvritError {
    run_with_input(source, &[]).0.unwrap_err()
}

#[test]
fn while_loop_sums() {
    let output = run("
        משתנה שלם i = 0
        משתנה שלם סכום = 0
        כל-עוד i < 5
            i += 1
            סכום += i
        סוף
        הדפס סכום
    ");
    assert_eq!(output, vec!["15"]);
}

#[test]
fn while_loop_with_false_condition_never_runs() {
    let output = run("
        כל-עוד 1 > 2
            הדפס \"בפנים\"
        סוף
        הדפס \"בחוץ\"
    ");
    assert_eq!(output, vec!["בחוץ"]);
}

#[test]
fn nested_loops_and_conditionals() {
    let output = run("
        משתנה שלם i = 1
        כל-עוד i < 4
            משתנה שלם j = 1
            כל-עוד j < 3
                אם (i * j) > 3
                    הדפס i + \"x\" + j
                סוף
                j += 1
            סוף
            i += 1
        סוף
    ");
    assert_eq!(output, vec!["2x2", "3x2"]);
}

#[test]
fn if_else_picks_one_branch() {
    let program = "
        משתנה שלם n = 7
        אם (n % 2) שווה 0
            הדפס \"זוגי\"
        אחרת
            הדפס \"אי-זוגי\"
        סוף
        הדפס \"סוף\"
    ";
    assert_eq!(run(program), vec!["אי-זוגי", "סוף"]);
    assert_eq!(
        run(&program.replace("n = 7", "n = 8")),
        vec!["זוגי", "סוף"]
    );
}

#[test]
fn not_equals_in_conditions() {
    let program = "
        משתנה שלם x = 1
        אם x לא-שווה 2
            הדפס \"שונה\"
        סוף
        אם (x לא-שווה 1) או (x שווה 1)
            הדפס \"אחד\"
        סוף
    ";
    assert_eq!(run(program), vec!["שונה", "אחד"]);
}

#[test]
fn list_literals_see_variables() {
    let output = run("
        משתנה שלם a = 7
        הדפס [a, 1]
        הדפס [a, 1] במקום 1
        הדפס \"x\" + (\"a\" + \"b\")
    ");
    assert_eq!(output, vec!["[7, 1]", "7", "xab"]);
}

#[test]
fn lone_operator_is_reported() {
    for source in ["הדפס -", "הדפס +", "משתנה שלם n = 1\nאם שווה\nסוף"] {
        let err = run_err(source);
        assert!(
            matches!(err.root(), IvritError::UnknownEvaluationFormat { count: 1, .. }),
            "{}: {:?}",
            source,
            err
        );
    }
}

#[test]
fn primitive_conditional_links_else_to_end() {
    let output = run("
        אם אמת אז @A, אחרת @B, בסוף @C
        @A
        הדפס \"then\"
        @B
        הדפס \"else\"
        @C
        הדפס \"after\"
    ");
    assert_eq!(output, vec!["then", "after"]);
}

#[test]
fn recursion_through_a_global_accumulator() {
    let output = run("
        משתנה שלם תוצאה = 1
        הפעל עצרת עם 5
        הדפס תוצאה
        צא

        פונקציה עצרת מקבלת שלם n מחזירה כלום
        אם n > 1
            תוצאה *= n
            הפעל עצרת עם n - 1
        סוף
        תחזור
    ");
    assert_eq!(output, vec!["120"]);
}

#[test]
fn call_resumes_after_call_site_and_restores_scope() {
    let output = run("
        משתנה שלם n = 1
        הפעל הצג עם 2
        הדפס n
        צא

        פונקציה הצג מקבלת שלם n מחזירה כלום
        הדפס n
        תחזור
    ");
    assert_eq!(output, vec!["2", "1"]);
}

#[test]
fn list_argument_and_indexing_in_a_loop() {
    let output = run("
        משתנה רשימה שלם ציונים = [90, 75, 100]
        משתנה שלם סך = 0
        הפעל סכם עם ציונים
        הדפס \"סך הכל: \" + סך
        צא

        פונקציה סכם מקבלת רשימה שלם xs מחזירה כלום
        משתנה שלם i = 1
        כל-עוד i < 4
            סך += xs במקום i
            i += 1
        סוף
        תחזיר סך
    ");
    assert_eq!(output, vec!["סך הכל: 265"]);
}

#[test]
fn function_with_several_arguments() {
    let output = run("
        הפעל ברך עם \"דנה\", 3
        צא

        פונקציה ברך מקבלת משפט שם, שלם פעמים מחזירה כלום
        משתנה שלם i = 0
        כל-עוד i < פעמים
            הדפס \"שלום \" + שם
            i += 1
        סוף
        תחזור
    ");
    assert_eq!(output, vec!["שלום דנה"; 3]);
}

#[test]
fn input_is_read_into_variables() {
    let (result, output) = run_with_input(
        "
        משתנה משפט שם = \"\"
        משתנה שלם גיל = 0
        קלוט-ל שם
        קלוט-ל גיל
        הדפס שם + \" בן \" + (גיל + 1)
        ",
        &["יוסי", "29"],
    );
    assert_eq!(result.unwrap(), Termination::EndOfProgram);
    assert_eq!(output, vec!["יוסי בן 30"]);
}

#[test]
fn exit_stops_the_run() {
    let (result, output) = run_with_input("הדפס 1\nצא\nהדפס 2", &[]);
    assert_eq!(result.unwrap(), Termination::Exit);
    assert_eq!(output, vec!["1"]);
}

#[test]
fn jump_skips_lines() {
    let output = run("
        קפוץ-ל המשך
        הדפס 1
        @המשך
        הדפס 2
    ");
    assert_eq!(output, vec!["2"]);
}

#[test]
fn report_and_variable_dump() {
    let preprocessed =
        preprocess(SourceProgram::from_text("משתנה משפט s = \"היי\"\nמשתנה רשימה שלם xs = []")).unwrap();
    let mut interpreter = Interpreter::new(preprocessed, BufferedIo::new()).unwrap();

    assert_eq!(interpreter.run().unwrap(), Termination::EndOfProgram);
    assert_eq!(
        interpreter.io().output(),
        &[
            "מתחיל לפרש את הקוד.".to_string(),
            "פירוש הקוד הסתיים לאחר שנקרא כל הקוד (לא עברנו דרך 'צא')".to_string(),
            "המשתנים שנותרו לאחר סיום התכנית:".to_string(),
            "(s : היי)".to_string(),
            "(xs : [])".to_string(),
            "(אמת : אמת)".to_string(),
            "(שקר : שקר)".to_string(),
        ]
    );
}

#[test]
fn errors_carry_the_failing_line() {
    let err = run_err("משתנה שלם x = 1\nהדפס y");
    assert_eq!(
        err.to_string(),
        "line 2 ('הדפס y'): cannot understand the word 'y'"
    );
    assert_eq!(err.kind(), ErrorKind::Reference);
}

#[test]
fn string_concatenation_errors() {
    assert_eq!(
        run_err("הדפס \"a\" \"b\"").root(),
        &IvritError::UnexpectedString("\"a\" \"b\"".to_string())
    );
    assert_eq!(
        run_err("הדפס \"a\" +").root(),
        &IvritError::AnotherValueExpected("\"a\" +".to_string())
    );
}

#[test]
fn reaching_a_function_header_is_an_error() {
    let err = run_err("פונקציה f מקבלת כלום מחזירה כלום\nתחזור");
    assert!(matches!(
        err.root(),
        IvritError::UnrecognizedAction { action, .. } if action == "פונקציה"
    ));
}

#[test]
fn reference_errors() {
    assert_eq!(
        run_err("תחזור").root(),
        &IvritError::ReturnFromGlobalScope
    );
    assert_eq!(
        run_err("קפוץ-ל לשום-מקום").root(),
        &IvritError::UndefinedLabel("לשום-מקום".to_string())
    );
    assert_eq!(
        run_err("הפעל f עם 1, 2\nצא\nפונקציה f מקבלת שלם a מחזירה כלום\nתחזור").root(),
        &IvritError::ArityMismatch {
            name: "f".to_string(),
            expected: 1,
            got: 2,
        }
    );
}

#[test]
fn type_errors() {
    assert!(matches!(
        run_err("משתנה שלם n = \"חמש\"").root(),
        IvritError::TypeMismatch { .. }
    ));
    assert_eq!(
        run_err("משתנה מספר n = 5").root(),
        &IvritError::UnknownType("מספר".to_string())
    );
    assert_eq!(run_err("הדפס 1 / 0").root(), &IvritError::DivisionByZero);
}

#[test]
fn structural_errors_stop_before_running() {
    let program = SourceProgram::from_text("אם אמת\nהדפס 1");
    assert_eq!(
        preprocess(program).unwrap_err(),
        IvritError::UnclosedBlocks { open: 1 }
    );

    let program = SourceProgram::from_text("פונקציה f מקבלת שלם מחזירה כלום");
    assert!(matches!(
        preprocess(program).unwrap_err(),
        IvritError::MalformedFunctionHeader { line: 1, .. }
    ));
}

#[test]
fn demo_programs_run() {
    let mut count = 0;
    for entry in fs::read_dir("demos").unwrap() {
        let path = entry.unwrap().path();
        if path.extension().map_or(true, |ext| ext != "ivr") {
            continue;
        }
        count += 1;

        let source = fs::read_to_string(&path).unwrap();
        let (result, _) = run_with_input(&source, &[]);
        if let Err(e) = result {
            panic!("demo {:?} failed: {}", path, e);
        }
    }
    assert!(count > 0, "No demo programs found in demos/");
}
