fn main() {
    env_logger::init();

    run();
}

#[cfg(not(feature = "enable_vibrato"))]
fn run() {
    eprintln!("rebuild with --features enable_vibrato to run the demo");
    std::process::exit(1);
}

#[cfg(feature = "enable_vibrato")]
fn run() {
    use kana2hangul::tokenizer::VibratoTokenizer;
    use kana2hangul::{render, ConverterConfig, RenderOptions};

    let lyrics_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./input.txt".to_string());
    let dict_path =
        std::env::var("KANA2HANGUL_SYSTEM_DIC").unwrap_or_else(|_| "./system.dic".to_string());

    let tokenizer = VibratoTokenizer::from_dict_path(&dict_path).unwrap();
    let converter = ConverterConfig::new().build(Box::new(tokenizer)).unwrap();

    log::info!("init done");

    let text = std::fs::read_to_string(&lyrics_path).unwrap();
    let lines = converter.convert(&text, true, 1.0).unwrap();

    let opts = RenderOptions {
        show_source: true,
        show_kana: true,
        show_translation: true,
        blank_line_between: true,
        ..RenderOptions::default()
    };
    println!("{}", render(&lines, &opts));
}
