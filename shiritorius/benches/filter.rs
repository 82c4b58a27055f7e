//! 述語エンジンのベンチマーク
//!
//! 合成したカタログに対して、索引の構築と条件による絞り込みの速度を計測します。

use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use shiritorius::katakana::Gyo;
use shiritorius::{Catalogue, CatalogueIndex, Conditions, Filter, Homonym, Word};

const PARTS_OF_SPEECH: [&str; 4] = ["名詞", "動詞", "形容詞", "副詞"];

/// 行の文字を組み合わせて、重複のない読みを持つカタログを作ります。
fn synthetic_catalogue(size: usize) -> Catalogue {
    let alphabet: Vec<char> = Gyo::ALL.iter().flat_map(|g| g.members().chars()).collect();
    let mut words = Vec::with_capacity(size);
    let mut n = 0usize;
    while words.len() < size {
        let mut reading = String::new();
        let mut k = n;
        loop {
            reading.push(alphabet[k % alphabet.len()]);
            k /= alphabet.len();
            if k == 0 {
                break;
            }
        }
        let id = words.len() as u64;
        words.push(Word {
            id,
            reading: reading.clone(),
            homonyms: vec![Homonym {
                id,
                surface_form: reading,
                part_of_speech: PARTS_OF_SPEECH[n % PARTS_OF_SPEECH.len()].to_string(),
            }],
        });
        n += 1;
    }
    Catalogue::new(words).unwrap().sorted()
}

fn bench_filter(c: &mut Criterion) {
    let catalogue = synthetic_catalogue(200_000);
    let index = CatalogueIndex::new(catalogue.words());

    let mut group = c.benchmark_group("Filter");
    group.throughput(Throughput::Elements(catalogue.len() as u64));
    group.warm_up_time(Duration::from_secs(3));
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    group.bench_function(BenchmarkId::new("Index", "Build"), |b| {
        b.iter(|| CatalogueIndex::new(black_box(catalogue.words())));
    });

    let initial = Conditions::initial(index.all_parts_of_speech());
    group.bench_function(BenchmarkId::new("Conditions", "Initial"), |b| {
        let filter = Filter::new(&initial);
        b.iter(|| filter.apply(black_box(&catalogue)).len());
    });

    let mut fragments = Conditions::all(index.all_parts_of_speech());
    fragments.begin_with = vec!["ネ".to_string(), "ノ".to_string()];
    fragments.include = vec!["ア".to_string(), "イ".to_string(), "ウ".to_string()];
    fragments.length = Some(3);
    group.bench_function(BenchmarkId::new("Conditions", "Fragments"), |b| {
        let filter = Filter::new(&fragments);
        b.iter(|| filter.apply(black_box(&catalogue)).len());
    });

    group.finish();
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
