use anyhow::Result;

use crate::dataset::OrsoDataset;
use crate::header::{ColumnSpec, DataSetId};

use super::{ValidationCheck, ValidationReport};

/// Step 4: Data sanity validation
pub(crate) fn check_data_sanity(datasets: &[OrsoDataset], report: &mut ValidationReport) -> Result<()> {
    for (i, dataset) in datasets.iter().enumerate() {
        let id = dataset.data_set().unwrap_or(DataSetId::Index(i as i64));
        check_dataset(&id, dataset, report);
    }
    Ok(())
}

fn check_dataset(id: &DataSetId, dataset: &OrsoDataset, report: &mut ValidationReport) {
    let data = dataset.data();
    let columns = dataset.columns();

    let name = format!("[{}] Data rows", id);
    if data.num_rows() == 0 {
        report.add_check(ValidationCheck::warning(name, "Dataset has no rows"));
    } else {
        report.add_check(ValidationCheck::ok(format!(
            "{} ({} rows x {} columns)",
            name,
            data.num_rows(),
            data.num_columns()
        )));
    }

    let non_finite = data
        .columns()
        .iter()
        .flatten()
        .filter(|v| !v.is_finite())
        .count();
    let name = format!("[{}] Finite values", id);
    if non_finite == 0 {
        report.add_check(ValidationCheck::ok(name));
    } else {
        report.add_check(ValidationCheck::warning(
            name,
            format!("{} NaN or infinite values", non_finite),
        ));
    }

    let name = format!("[{}] Abscissa unit", id);
    match columns.first() {
        Some(ColumnSpec::Data { unit: Some(_), .. }) => report.add_check(ValidationCheck::ok(name)),
        Some(first) => report.add_check(ValidationCheck::warning(
            name,
            format!("First column '{}' has no unit", first.name()),
        )),
        None => report.add_check(ValidationCheck::warning(name, "No column descriptors")),
    }

    check_error_columns(id, dataset, &columns, report);
}

fn check_error_columns(
    id: &DataSetId,
    dataset: &OrsoDataset,
    columns: &[ColumnSpec],
    report: &mut ValidationReport,
) {
    // Unresolved descriptors are skipped by `columns`, so positions only
    // line up with the table when every descriptor resolved.
    let aligned = columns.len() == dataset.data().num_columns();
    for (index, column) in columns.iter().enumerate() {
        let ColumnSpec::Error { error_of, model } = column else {
            continue;
        };
        let name = format!("[{}] Error column {}", id, column.name());

        let annotated = columns
            .iter()
            .any(|c| matches!(c, ColumnSpec::Data { name, .. } if name == error_of));
        if !annotated {
            report.add_check(ValidationCheck::failed(
                name,
                format!("Refers to unknown column '{}'", error_of),
            ));
            continue;
        }

        if let Err(e) = model.to_sigma() {
            report.add_check(ValidationCheck::warning(name, e.to_string()));
            continue;
        }

        let negative = dataset
            .data()
            .column(index)
            .filter(|_| aligned)
            .map(|values| values.iter().filter(|v| **v < 0.0).count())
            .unwrap_or(0);
        if negative > 0 {
            report.add_check(ValidationCheck::warning(
                name,
                format!("{} negative error values", negative),
            ));
        } else {
            report.add_check(ValidationCheck::ok(name));
        }
    }
}
