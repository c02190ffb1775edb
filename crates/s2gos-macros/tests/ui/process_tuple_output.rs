use s2gos_core::{Annotation, IntoProcess};
use s2gos_macros::process;

#[process(version = "1.0.0", description = "Minimum and maximum of a list")]
fn min_max(values: Vec<f64>) -> (f64, f64) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

fn main() {
    let (function, options) = MinMaxProcess.into_process();
    assert_eq!(options.version.as_deref(), Some("1.0.0"));
    assert_eq!(
        options.description.as_deref(),
        Some("Minimum and maximum of a list")
    );
    assert_eq!(
        function.signature().returns,
        Annotation::Tuple(vec![Annotation::Float, Annotation::Float])
    );
    assert_eq!(function.signature().output_arity(), 2);
}
