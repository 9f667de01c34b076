use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use typetutor::engine::charset::Charset;
use typetutor::engine::filter::filter_words;
use typetutor::engine::settings::Settings;
use typetutor::generator::composer::{ComposerLimits, LineComposer, LineRequest};
use typetutor::generator::dictionary::{Corpus, Dictionary};
use typetutor::generator::pool::WordPool;
use typetutor::keyboard::levels::LevelRegistry;

fn bench_filter(c: &mut Criterion) {
    let dictionary = Dictionary::load();
    let registry = LevelRegistry::builtin();
    let charset = Charset::for_level(&registry, "qwerty", 4, &Settings::default()).unwrap();

    c.bench_function("filter_words (embedded dictionary, qwerty level 4)", |b| {
        b.iter(|| {
            filter_words(
                black_box(dictionary.words()),
                black_box(&charset.legal),
                black_box(&charset.required),
            )
        })
    });
}

fn bench_pool(c: &mut Criterion) {
    let mut pool = WordPool::new(
        Dictionary::load(),
        LevelRegistry::builtin(),
        Settings::default(),
        SmallRng::seed_from_u64(42),
    );

    c.bench_function("generate pool (colemak level 5)", |b| {
        b.iter(|| pool.generate(black_box("colemak"), black_box(5)).unwrap())
    });

    pool.generate("colemak", 5).unwrap();
    c.bench_function("random_words (20 draws)", |b| {
        b.iter(|| pool.random_words(black_box(20)).unwrap())
    });
}

fn bench_composer(c: &mut Criterion) {
    let pool = WordPool::new(
        Dictionary::load(),
        LevelRegistry::builtin(),
        Settings::default(),
        SmallRng::seed_from_u64(7),
    );
    let mut composer = LineComposer::new(pool, ComposerLimits::default(), SmallRng::seed_from_u64(8));
    let request = LineRequest::new("dvorak", 2);
    composer.prepare(&request).unwrap();

    c.bench_function("generate_line (dvorak level 2)", |b| {
        b.iter(|| composer.generate_line(black_box(10), &request).unwrap())
    });
}

criterion_group!(benches, bench_filter, bench_pool, bench_composer);
criterion_main!(benches);
