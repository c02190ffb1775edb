use s2gos_core::IntoProcess;
use s2gos_macros::process;

#[process]
fn answer() -> i64 {
    42
}

fn main() {
    let (function, options) = AnswerProcess.into_process();
    assert!(function.name().ends_with("::answer"));
    assert!(options.id.is_none());
    assert!(function.signature().parameters.is_empty());
    assert_eq!(answer(), 42);
}
