use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::time::Duration;
use zhconv::{Locale, RuleData, ZhConverter};

const SAMPLE_DICT: &str = include_str!("../tests/data/zhcdict.json");

fn sample_converter(is_parallel: bool) -> ZhConverter {
    let rules = RuleData::from_json_str(SAMPLE_DICT).expect("sample rule data parses");
    let mut converter = ZhConverter::new(rules);
    converter.set_parallel(is_parallel);
    converter
        .warm_up(&Locale::ALL)
        .expect("sample dictionaries build");
    converter
}

fn bench_convert_zh_cn_100k(c: &mut Criterion) {
    let input = "我的電腦裡有軟體和記憶體，還有滑鼠。".repeat(5556); // ~100,008 characters
    let sequential = sample_converter(false);
    let parallel = sample_converter(true);

    c.bench_function("convert_zh_cn_100k", |b| {
        b.iter(|| sequential.convert(black_box(&input), "zh-cn"));
    });
    c.bench_function("convert_zh_cn_100k_parallel", |b| {
        b.iter(|| parallel.convert(black_box(&input), "zh-cn"));
    });
}

fn bench_convert_zh_tw_100k(c: &mut Criterion) {
    let input = "我的计算机里有软件和内存，还有鼠标。".repeat(5556);
    let converter = sample_converter(true);

    c.bench_function("convert_zh_tw_100k", |b| {
        b.iter(|| converter.convert(black_box(&input), "zh-tw"));
    });
}

fn bench_build_dictionary(c: &mut Criterion) {
    let rules = RuleData::from_json_str(SAMPLE_DICT).expect("sample rule data parses");

    c.bench_function("build_zh_hk_dictionary", |b| {
        b.iter(|| zhconv::LocaleDict::build(black_box(&rules), Locale::ZhHk));
    });
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .warm_up_time(Duration::from_secs(3))
        .measurement_time(Duration::from_secs(5))
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_convert_zh_cn_100k, bench_convert_zh_tw_100k, bench_build_dictionary
}
criterion_main!(benches);
