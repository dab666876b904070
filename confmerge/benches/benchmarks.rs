// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::path::Path;

use confmerge::{Format, TargetListBuilder, merge_documents, parse_document};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn duplicated_config(hosts: usize, copies: usize,) -> String
{
    let mut yaml = String::from("targets:\n",);
    for _ in 0..copies {
        for host in 0..hosts {
            yaml.push_str(&format!(
                "  - host: app-{host}\n    port: 9999\n    queries:\n      - object: java.lang:type=Memory\n        attributes: [HeapMemoryUsage, NonHeapMemoryUsage]\n        sinks:\n          - type: graphite\n            host: metrics\n            port: 2003\n            prefix: prod\n            ratio: 0.5\n      - object: java.lang:type=Threading\n        attributes: [ThreadCount]\n        sinks:\n          - type: stdout\n    sinks:\n      - type: graphite\n        host: metrics\n        port: 2003\n        prefix: prod\n        ratio: 0.5\n"
            ),);
        }
    }
    yaml
}

fn benchmark_parse_document(c: &mut Criterion,)
{
    let yaml = duplicated_config(10, 1,);
    let origin = Path::new("bench.yaml",);

    c.bench_function("parse_document_small", |b| {
        b.iter(|| parse_document(black_box(&yaml,), Format::Yaml, origin,).expect("parse failed",),)
    },);
}

fn benchmark_merge_duplicates(c: &mut Criterion,)
{
    let document = parse_document(&duplicated_config(100, 5,), Format::Yaml, Path::new("bench.yaml",),)
        .expect("parse failed",);
    let targets = document.to_targets();

    c.bench_function("merge_500_targets_100_hosts", |b| {
        b.iter(|| {
            let mut builder = TargetListBuilder::new();
            builder.add_all(black_box(&targets,),);
            black_box(builder.build().len(),)
        },)
    },);
}

fn benchmark_merge_documents(c: &mut Criterion,)
{
    let documents: Vec<_,> = (0..5)
        .map(|index| {
            let origin = format!("bench-{index}.yaml");
            parse_document(&duplicated_config(50, 1,), Format::Yaml, Path::new(&origin,),)
                .expect("parse failed",)
        },)
        .collect();

    c.bench_function("merge_documents_5x50", |b| {
        b.iter(|| black_box(merge_documents(black_box(&documents,),).distinct_sinks,),)
    },);
}

criterion_group!(
    benches,
    benchmark_parse_document,
    benchmark_merge_duplicates,
    benchmark_merge_documents
);
criterion_main!(benches);
