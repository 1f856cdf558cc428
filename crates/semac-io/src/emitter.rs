use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use semac_core::CoreError;
use semac_engine::Cashflows;

/// Fixed six-decimal rendering with a comma as the decimal separator.
pub fn format_amount(value: f64) -> String {
    format!("{:.6}", value).replace('.', ",")
}

/// Write the cashflow matrix as `;`-separated text: one header row with
/// the state names in ascending lexicographic order followed by `Total`,
/// then one row of amounts per time step.
pub fn write_cashflows(path: impl AsRef<Path>, cashflows: &Cashflows) -> Result<(), CoreError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| CoreError::OutputOpenFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let mut w = BufWriter::new(file);

    let write_err = |source| CoreError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let names: Vec<&str> = cashflows.state_names().collect();
    let mut header = names.join(";");
    if !header.is_empty() {
        header.push(';');
    }
    header.push_str(Cashflows::TOTAL_KEY);
    writeln!(w, "{header}").map_err(write_err)?;

    for t in 0..=cashflows.steps() {
        let mut fields: Vec<String> = names
            .iter()
            .map(|n| format_amount(cashflows.get(n).expect("named column")[t]))
            .collect();
        fields.push(format_amount(cashflows.total()[t]));
        writeln!(w, "{}", fields.join(";")).map_err(write_err)?;
    }

    w.flush().map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use semac_core::{Model, TransitionTable};
    use semac_engine::{Engine, RunSpec};
    use semac_payoff::ConstantPayoff;
    use std::fs;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("semac-{}-{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn amounts_use_comma_decimals() {
        assert_eq!(format_amount(1234.5), "1234,500000");
        assert_eq!(format_amount(0.0), "0,000000");
        assert_eq!(format_amount(-0.25), "-0,250000");
    }

    #[test]
    fn header_is_lexicographic_with_trailing_total() {
        // States appear as Z, A, B in the file; the emitted header must
        // not care about appearance order.
        let table = TransitionTable::parse("Z;A\nA;B\nstate;age\n1.0;1.0\n".as_bytes()).unwrap();
        let mut model = Model::from_table(table);
        model.initialize_batch(1, "Z", 0, 0, 0).unwrap();
        let cf = Engine::new(&mut model, ConstantPayoff::new(1.0), 1)
            .get_cashflow(&RunSpec::new(1, 1), Some(3))
            .unwrap();

        let path = scratch_path("header");
        write_cashflows(&path, &cf).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("A;B;Z;Total"));
        // One row per time step, t = 0 and t = 1.
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn rows_carry_formatted_values() {
        let table = TransitionTable::parse("A\nA\nstate\n1.0\n".as_bytes()).unwrap();
        let mut model = Model::from_table(table);
        model.initialize_batch(1, "A", 0, 0, 0).unwrap();
        let cf = Engine::new(&mut model, ConstantPayoff::new(2.5), 1)
            .get_cashflow(&RunSpec::new(1, 0), Some(3))
            .unwrap();

        let path = scratch_path("rows");
        write_cashflows(&path, &cf).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(text, "A;Total\n2,500000;2,500000\n");
    }

    #[test]
    fn unwritable_target_reports_open_failure() {
        let table = TransitionTable::parse("A\nA\nstate\n1.0\n".as_bytes()).unwrap();
        let mut model = Model::from_table(table);
        model.initialize_batch(1, "A", 0, 0, 0).unwrap();
        let cf = Engine::new(&mut model, ConstantPayoff::new(1.0), 1)
            .get_cashflow(&RunSpec::new(1, 0), Some(3))
            .unwrap();

        let err = write_cashflows("/nonexistent-dir/out.csv", &cf).unwrap_err();
        assert!(matches!(err, CoreError::OutputOpenFailed { .. }));
    }
}
