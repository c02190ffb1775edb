use s2gos_core::{Annotation, IntoProcess, JobContext};
use s2gos_macros::process;
use s2gos_protocols::ProcessError;

/// Sleeps for `duration` seconds.
///
/// Fails on purpose if `fail` is true.
#[process(id = "sleep_a_while", title = "Sleep Processor", keyword = "demo", keyword = "sleep")]
pub fn sleep_a_while(
    ctx: &JobContext,
    #[default(10.0)] duration: f64,
    #[default(false)] fail: bool,
) -> Result<f64, ProcessError> {
    ctx.report_progress(Some(0), None)?;
    if fail {
        return Err(ProcessError::failed("Woke up too early"));
    }
    Ok(duration)
}

fn main() {
    let (function, options) = SleepAWhileProcess.into_process();
    assert_eq!(options.id.as_deref(), Some("sleep_a_while"));
    assert_eq!(options.title.as_deref(), Some("Sleep Processor"));
    assert_eq!(options.keywords, vec!["demo", "sleep"]);
    assert_eq!(
        function.doc(),
        Some("Sleeps for `duration` seconds.\n\nFails on purpose if `fail` is true.")
    );

    let params = &function.signature().parameters;
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].name, "duration");
    assert_eq!(params[0].annotation, Annotation::Float);
    assert_eq!(params[0].default, Some(serde_json::json!(10.0)));
    assert_eq!(params[1].default, Some(serde_json::json!(false)));
    assert_eq!(function.signature().returns, Annotation::Float);

    let ctx = JobContext::detached("sleep_a_while");
    assert_eq!(sleep_a_while(&ctx, 1.5, false).unwrap(), 1.5);
}
