// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bim_bridge_model::{Category, CategoryId, Element, NativeClass, Workset, WorksetId};
use bim_bridge_query::{resolve, DomainType, FilterNode, LeafFilter, WorksetSelector};
use bim_bridge_store::{DocumentSnapshot, MemoryDocument};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_document(count: i64) -> MemoryDocument {
    let classes = [
        NativeClass::Wall,
        NativeClass::Floor,
        NativeClass::FamilyInstance,
        NativeClass::Level,
    ];
    let mut snapshot = DocumentSnapshot::new()
        .with_category(Category::new(CategoryId(1), "Walls"))
        .with_category(Category::new(CategoryId(2), "Floors"))
        .with_category(Category::new(CategoryId(3), "Generic Models"))
        .with_workset(Workset::new(WorksetId(1), "Shared", true))
        .with_workset(Workset::new(WorksetId(2), "Arch", true))
        .with_workset(Workset::new(WorksetId(3), "Linked", false))
        .with_active_workset(WorksetId(1));

    for id in 1..=count {
        let class = classes[(id % 4) as usize].clone();
        snapshot = snapshot.with_element(
            Element::new(id, format!("pid-{id}"), class, format!("Element {id}"))
                .with_category(CategoryId(id % 3 + 1))
                .with_workset(WorksetId(id % 3 + 1)),
        );
    }
    MemoryDocument::from_snapshot(snapshot).unwrap()
}

fn bench_resolve(c: &mut Criterion) {
    let doc = synthetic_document(20_000);

    let nested = FilterNode::or(vec![
        FilterNode::and(vec![
            FilterNode::leaf(LeafFilter::new().of_type(DomainType::Wall)),
            FilterNode::leaf(LeafFilter::new().in_category("Walls")),
        ]),
        FilterNode::leaf(LeafFilter::new().with_worksets(WorksetSelector::named("Arch"))),
    ]);
    let negated = FilterNode::and(vec![
        FilterNode::leaf(LeafFilter::new().of_type(DomainType::Element)),
        FilterNode::not(FilterNode::leaf(
            LeafFilter::new().with_worksets(WorksetSelector::open()),
        )),
    ]);

    let mut group = c.benchmark_group("resolve");
    group.bench_function("nested_and_or", |b| {
        b.iter(|| resolve(black_box(&nested), &doc).len())
    });
    group.bench_function("element_not_open", |b| {
        b.iter(|| resolve(black_box(&negated), &doc).len())
    });
    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
