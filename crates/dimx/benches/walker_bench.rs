use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dimx::app_types::AppTypeIndex;
use dimx::common::RawDocument;
use dimx::tables::build_tables;
use dimx::tokens::TokenCatalog;
use dimx::walker::{Dimensions, DocumentWalker};
use serde_json::json;

fn synthetic_documents(documents: usize, projects: usize, microservices: usize) -> Vec<RawDocument> {
    (0..documents)
        .map(|d| {
            let projects: Vec<_> = (0..projects)
                .map(|p| {
                    let ms: Vec<_> = (0..microservices)
                        .map(|m| {
                            json!({
                                "tokenOcp": format!("token{}", m % 7),
                                "repositoryUrl": format!("https://git.example/p{p}/svc{m}.git"),
                                "config": {
                                    "appName": format!("svc-{d}-{p}-{m}"),
                                    "country": if m % 2 == 0 { "CO" } else { "PE" },
                                    "ocpLabel": "web",
                                    "secrets": [{"secret": m % 3 == 0}],
                                    "volumes": [{"volume": true, "mountPath": "/data"}],
                                    "resQuotasmaster": [{"cpuLimits": "500m", "replicas": 2}]
                                }
                            })
                        })
                        .collect();
                    json!({"name": format!("project {p}"), "ms": ms})
                })
                .collect();
            RawDocument::new(
                format!("doc{d}-apis.json"),
                json!({ "projects": projects }).to_string(),
            )
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let documents = synthetic_documents(20, 5, 10);
    let names: Vec<String> = documents.iter().map(|doc| doc.name.clone()).collect();
    let tokens = TokenCatalog::from_entries(
        (0..7).flat_map(|t| {
            ["dev", "uat", "prd"]
                .into_iter()
                .map(move |suffix| (format!("token{t}{suffix}"), format!("secret-{t}-{suffix}")))
        }),
    );

    c.bench_function("walk 20 docs x 50 microservices", |b| {
        b.iter(|| {
            let mut walker =
                DocumentWalker::new(Dimensions::new(), &tokens, AppTypeIndex::new(names.iter().cloned()));
            for document in &documents {
                walker.walk_document(black_box(document));
            }
            walker.finish()
        })
    });

    c.bench_function("walk and build tables", |b| {
        b.iter(|| {
            let mut walker =
                DocumentWalker::new(Dimensions::new(), &tokens, AppTypeIndex::new(names.iter().cloned()));
            for document in &documents {
                walker.walk_document(black_box(document));
            }
            build_tables(&walker.finish())
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
