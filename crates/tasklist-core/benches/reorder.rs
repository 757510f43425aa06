#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tasklist_core::{FilterMode, Task, TaskId, TaskList, reorder};

fn build_list(len: usize) -> TaskList {
    (0..len)
        .map(|idx| Task {
            id: TaskId::random(),
            text: format!("task {idx}"),
            completed: idx % 3 == 0,
        })
        .collect()
}

fn reorder_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder_filtered_view");
    for &len in &[16_usize, 256, 4096] {
        let tasks = build_list(len);
        let view = tasks.project(FilterMode::Todo);
        let (Some(first), Some(last)) = (view.first(), view.last()) else {
            continue;
        };
        let from = last.id.clone();
        let to = first.id.clone();
        group.bench_with_input(BenchmarkId::from_parameter(len), &tasks, |b, tasks| {
            b.iter(|| reorder(black_box(tasks), FilterMode::Todo, &from, &to));
        });
    }
    group.finish();
}

fn project_benchmark(c: &mut Criterion) {
    let tasks = build_list(4096);
    c.bench_function("project_done_4096", |b| {
        b.iter(|| black_box(&tasks).project(FilterMode::Done).len());
    });
}

criterion_group!(benches, reorder_benchmark, project_benchmark);
criterion_main!(benches);
