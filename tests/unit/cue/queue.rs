use super::*;

fn value(queue: &CommandQueue, x: i32, y: i32, dx: i32, dy: i32) -> Option<f64> {
    let mut out = Vec::new();
    queue.resolve(x, y, dx, dy, &mut out);
    out.first().copied()
}

#[test]
fn empty_queue_resolves_to_nothing() {
    let queue = CommandQueue::new();
    let mut out = vec![1.0, 2.0];
    queue.resolve(0, 0, 3, 3, &mut out);
    assert!(out.is_empty());
}

#[test]
fn later_commands_override_earlier_ones() {
    let mut queue = CommandQueue::new();
    queue.push(CueCommand::whole_range(&[1.0], &[9.0], false));
    queue.push(CueCommand::x_range(1, &[14.0], &[14.0]));
    queue.push(CueCommand::single(0, 1, &[60.0]));
    assert_eq!(value(&queue, 0, 0, 3, 3), Some(1.0));
    assert_eq!(value(&queue, 2, 1, 3, 3), Some(14.0));
    assert_eq!(value(&queue, 0, 1, 3, 3), Some(60.0));
}

#[test]
fn whole_range_clears_and_reports_positions() {
    let mut queue = CommandQueue::new();
    queue.push(CueCommand::x_range(0, &[1.0], &[2.0]));
    queue.push(CueCommand::y_range(0, &[1.0], &[2.0]));
    let removed = queue.push(CueCommand::whole_range(&[1.0], &[9.0], false));
    assert_eq!(removed.len(), 2);
    assert_eq!(removed[0].position, 0);
    assert_eq!(removed[1].position, 1);
    assert_eq!(removed[1].command.kind(), CommandKind::YRange);
    assert_eq!(queue.len(), 1);
}

#[test]
fn x_range_evicts_singles_and_x_ranges_on_same_row() {
    let mut queue = CommandQueue::new();
    queue.append(CueCommand::single(0, 1, &[5.0]));
    queue.append(CueCommand::single(0, 2, &[6.0]));
    queue.append(CueCommand::x_range(1, &[1.0], &[2.0]));
    queue.append(CueCommand::y_range(1, &[1.0], &[2.0]));
    let removed = queue.push(CueCommand::x_range(1, &[7.0], &[7.0]));
    let positions: Vec<_> = removed.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![0, 2]);
    assert_eq!(queue.len(), 3);
}

#[test]
fn y_range_evicts_singles_and_y_ranges_on_same_column() {
    let mut queue = CommandQueue::new();
    queue.append(CueCommand::single(2, 0, &[5.0]));
    queue.append(CueCommand::y_range(2, &[1.0], &[2.0]));
    queue.append(CueCommand::x_range(2, &[1.0], &[2.0]));
    let removed = queue.push(CueCommand::y_range(2, &[3.0], &[3.0]));
    assert_eq!(removed.len(), 2);
    assert_eq!(queue.commands()[0].kind(), CommandKind::XRange);
}

#[test]
fn single_only_evicts_same_cell() {
    let mut queue = CommandQueue::new();
    queue.push(CueCommand::single(0, 0, &[1.0]));
    queue.push(CueCommand::single(1, 0, &[2.0]));
    let removed = queue.push(CueCommand::single(0, 0, &[3.0]));
    assert_eq!(removed.len(), 1);
    assert_eq!(queue.len(), 2);
    assert_eq!(value(&queue, 0, 0, 2, 2), Some(3.0));
}

#[test]
fn remove_first_erases_one_equal_command() {
    let mut queue = CommandQueue::new();
    let cmd = CueCommand::single(0, 0, &[1.0]);
    queue.append(cmd.clone());
    queue.append(cmd.clone());
    assert_eq!(queue.remove_first(&cmd, 0.0), Some(0));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.remove_first(&CueCommand::single(1, 1, &[1.0]), 0.0), None);
}
