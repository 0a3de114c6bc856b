use super::*;

fn resolve(cmd: &CueCommand, x: i32, y: i32, dx: i32, dy: i32) -> Vec<f64> {
    let mut out = Vec::new();
    cmd.write_values(x, y, dx, dy, &mut out);
    out
}

#[test]
fn kind_ordinals_are_stable() {
    for (kind, ordinal) in [
        (CommandKind::Single, 0),
        (CommandKind::XRange, 1),
        (CommandKind::YRange, 2),
        (CommandKind::WholeRangeRowMajor, 3),
        (CommandKind::WholeRangeColumnMajor, 4),
    ] {
        assert_eq!(kind.ordinal(), ordinal);
        assert_eq!(CommandKind::from_ordinal(ordinal), Some(kind));
    }
    assert_eq!(CommandKind::from_ordinal(5), None);
}

#[test]
fn single_matches_only_its_cell() {
    let cmd = CueCommand::single(1, 2, &[60.0]);
    assert!(cmd.matches(1, 2));
    assert!(!cmd.matches(2, 1));
    assert_eq!(resolve(&cmd, 1, 2, 5, 5), vec![60.0]);
}

#[test]
fn x_range_interpolates_along_columns() {
    let cmd = CueCommand::x_range(1, &[0.0], &[10.0]);
    assert!(cmd.matches(3, 1));
    assert!(!cmd.matches(3, 0));
    assert_eq!(resolve(&cmd, 0, 1, 3, 3), vec![0.0]);
    assert_eq!(resolve(&cmd, 1, 1, 3, 3), vec![5.0]);
    assert_eq!(resolve(&cmd, 2, 1, 3, 3), vec![10.0]);

    let every_row = CueCommand::x_range(-1, &[0.0], &[10.0]);
    assert!(every_row.matches(0, 7));
}

#[test]
fn y_range_interpolates_along_rows() {
    let cmd = CueCommand::y_range(2, &[0.0, 100.0], &[4.0, 0.0]);
    assert!(cmd.matches(2, 9));
    assert!(!cmd.matches(1, 0));
    assert_eq!(resolve(&cmd, 2, 1, 3, 5), vec![1.0, 75.0]);
}

#[test]
fn whole_range_row_and_column_major() {
    let row = CueCommand::whole_range(&[1.0], &[9.0], false);
    let col = CueCommand::whole_range(&[1.0], &[9.0], true);
    assert_eq!(row.kind(), CommandKind::WholeRangeRowMajor);
    assert_eq!(col.kind(), CommandKind::WholeRangeColumnMajor);
    assert!(row.matches(100, -3));
    // (x=1, y=0): row-major index 1, column-major index 3.
    assert_eq!(resolve(&row, 1, 0, 3, 3), vec![2.0]);
    assert_eq!(resolve(&col, 1, 0, 3, 3), vec![4.0]);
}

#[test]
fn one_by_one_grid_yields_min() {
    for cmd in [
        CueCommand::x_range(0, &[3.0], &[7.0]),
        CueCommand::y_range(0, &[3.0], &[7.0]),
        CueCommand::whole_range(&[3.0], &[7.0], false),
        CueCommand::whole_range(&[3.0], &[7.0], true),
    ] {
        let v = resolve(&cmd, 0, 0, 1, 1);
        assert_eq!(v, vec![3.0]);
        assert!(v[0].is_finite());
    }
}

#[test]
fn mismatched_lengths_use_shorter_list() {
    let cmd = CueCommand::x_range(0, &[1.0, 2.0, 3.0], &[4.0]);
    assert_eq!(cmd.number_of_values(), 1);
    assert_eq!(cmd.max_values(), &[4.0]);
}

#[test]
fn same_as_honors_tolerance() {
    let a = CueCommand::whole_range(&[1.0], &[9.0], false);
    let b = CueCommand::whole_range(&[1.0 + 1e-12], &[9.0], false);
    assert!(a.same_as(&a.clone(), 0.0));
    assert!(!a.same_as(&b, 0.0));
    assert!(a.same_as(&b, 1e-9));
    let c = CueCommand::whole_range(&[1.0], &[9.0], true);
    assert!(!a.same_as(&c, 1.0));
}

#[test]
fn xml_uses_scalar_for_one_value_and_list_for_many() {
    let one = CueCommand::single(0, 0, &[60.0]).to_xml();
    assert_eq!(one.name(), CUE_COMMAND_TAG);
    assert_eq!(one.attribute("type"), Some("0"));
    assert_eq!(one.attribute("numberOfValues"), Some("1"));
    assert_eq!(one.attribute("minValues"), Some("60"));

    let many = CueCommand::x_range(3, &[1.0, 2.5], &[4.0, 8.0]).to_xml();
    assert_eq!(many.attribute("anchorY"), Some("3"));
    assert_eq!(many.attribute("minValues"), Some("1,2.5"));
    assert_eq!(many.attribute("maxValues"), Some("4,8"));

    let empty = CueCommand::single(0, 0, &[]).to_xml();
    assert_eq!(empty.attribute("minValues"), None);
    assert_eq!(CueCommand::from_xml(&empty).unwrap().number_of_values(), 0);
}

#[test]
fn xml_parse_rejects_inconsistent_commands() {
    let base = CueCommand::x_range(1, &[1.0, 2.0], &[3.0, 4.0]).to_xml();
    assert_eq!(
        CueCommand::from_xml(&base).unwrap(),
        CueCommand::x_range(1, &[1.0, 2.0], &[3.0, 4.0])
    );

    let wrong_count = base.clone().with_attribute("numberOfValues", "3");
    assert!(CueCommand::from_xml(&wrong_count).is_err());

    let bad_type = base.clone().with_attribute("type", "9");
    assert!(CueCommand::from_xml(&bad_type).is_err());

    let mut only_min = XmlElement::new(CUE_COMMAND_TAG);
    only_min
        .set_attribute("type", "0")
        .set_attribute("anchorX", "0")
        .set_attribute("anchorY", "0")
        .set_attribute("numberOfValues", "1")
        .set_attribute("minValues", "1");
    assert!(CueCommand::from_xml(&only_min).is_err());

    let no_anchor = XmlElement::new(CUE_COMMAND_TAG)
        .with_attribute("type", "0")
        .with_attribute("numberOfValues", "0");
    assert!(CueCommand::from_xml(&no_anchor).is_err());
}
