use whg_rs::aggregate::build;
use whg_rs::models::{AggregatedCountryTable, YearTable};
use whg_rs::stats::{report, resolve_field};
use whg_rs::WhgError;
use whg_rs::models::Field;

const LIFE: [f64; 10] = [0.5, 0.9, 0.1, 0.7, 0.3, 0.8, 0.2, 0.6, 0.4, 1.0];

/// C00..C09 in rank order; GDP dominates the total so LIFE does not affect ranks.
fn table() -> AggregatedCountryTable {
    let mut t = YearTable::new(2019, vec!["GDP".into(), "LIFE EXPECTANCY".into()]);
    for (i, life) in LIFE.iter().enumerate() {
        t.push(format!("C{i:02}"), vec![100.0 - 10.0 * i as f64, *life]);
    }
    build(&[t]).unwrap().by_country
}

fn names(s: &[whg_rs::stats::Standing]) -> Vec<&str> {
    s.iter().map(|x| x.country.as_str()).collect()
}

#[test]
fn top_bottom_and_summary_for_life_expectancy() {
    let t = table();
    let s = report("LIFE EXPECTANCY", &t).unwrap();
    assert_eq!(s.field, "LIFE EXPECTANCY");
    assert_eq!(s.count, 10);
    assert_eq!(names(&s.top), vec!["C09", "C01", "C05", "C03", "C07"]);
    assert_eq!(names(&s.bottom), vec!["C02", "C06", "C04", "C08", "C00"]);
    assert_eq!(s.top[0].value, 1.0);
    assert_eq!(s.top[0].rank, 10);
    assert_eq!(s.bottom[0].value, 0.1);

    let mean = LIFE.iter().sum::<f64>() / LIFE.len() as f64;
    assert!((s.mean - mean).abs() < 1e-9);
    assert!((s.mean - 0.55).abs() < 1e-9);
    assert_eq!(s.min, 0.1);
    assert_eq!(s.max, 1.0);
}

#[test]
fn category_names_ignore_case_and_include_total() {
    let t = table();
    assert!(report("life expectancy", &t).is_ok());
    assert_eq!(resolve_field(&t, "total").unwrap(), Field::Total);
    let s = report("TOTAL", &t).unwrap();
    assert_eq!(names(&s.top), vec!["C00", "C01", "C02", "C03", "C04"]);
    assert_eq!(s.max, t.by_rank(1).unwrap().total);
}

#[test]
fn rank_and_unknown_names_are_rejected() {
    let t = table();
    assert_eq!(
        report("RANK", &t),
        Err(WhgError::UnknownIndicator("RANK".into()))
    );
    assert!(matches!(
        report("HAPPINESS", &t),
        Err(WhgError::UnknownIndicator(_))
    ));
}

#[test]
fn ties_keep_table_order() {
    let mut y = YearTable::new(2020, vec!["GDP".into(), "GENEROSITY".into()]);
    for i in 0..7 {
        y.push(format!("K{i}"), vec![10.0 - i as f64, 0.5]);
    }
    let t = build(&[y]).unwrap().by_country;
    let s = report("GENEROSITY", &t).unwrap();
    assert_eq!(names(&s.top), vec!["K0", "K1", "K2", "K3", "K4"]);
    assert_eq!(names(&s.bottom), vec!["K0", "K1", "K2", "K3", "K4"]);
    assert_eq!(s.min, s.max);
}

#[test]
fn small_tables_return_every_row() {
    let mut y = YearTable::new(2020, vec!["GDP".into()]);
    y.push("ONLY", vec![1.0]);
    y.push("OTHER", vec![2.0]);
    let t = build(&[y]).unwrap().by_country;
    let s = report("GDP", &t).unwrap();
    assert_eq!(names(&s.top), vec!["OTHER", "ONLY"]);
    assert_eq!(names(&s.bottom), vec!["ONLY", "OTHER"]);
    assert_eq!(s.mean, 1.5);
}

#[test]
fn report_does_not_touch_the_table() {
    let t = table();
    let before = t.clone();
    let _ = report("GDP", &t).unwrap();
    assert_eq!(t, before);
}

#[test]
fn countries_without_the_field_are_left_out() {
    let mut y = YearTable::new(2021, vec!["GDP".into(), "CORRUPTION".into()]);
    y.push("QATAR", [Some(1.5), None]);
    y.push("PERU", [Some(1.0), Some(0.25)]);
    y.push("CHAD", [Some(0.5), Some(0.75)]);
    let t = build(&[y]).unwrap().by_country;

    let s = report("corruption", &t).unwrap();
    assert_eq!(s.count, 2);
    assert_eq!(s.missing, 1);
    assert_eq!(names(&s.top), vec!["CHAD", "PERU"]);
    assert_eq!(s.mean, 0.5);
    assert_eq!(s.min, 0.25);

    let s = report("TOTAL", &t).unwrap();
    assert_eq!(s.missing, 0);
    assert_eq!(s.max, 1.5);
}

#[test]
fn a_field_nobody_has_is_an_error() {
    let mut y = YearTable::new(2021, vec!["GDP".into(), "CORRUPTION".into()]);
    y.push("QATAR", [Some(1.5), None]);
    y.push("PERU", [Some(1.0), None]);
    let t = build(&[y]).unwrap().by_country;
    assert!(matches!(report("CORRUPTION", &t), Err(WhgError::EmptyTable { .. })));
}
