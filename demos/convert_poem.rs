use zhconv::{Locale, RuleData, ZhConverter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ---------------------------------------------------------------------
    // Sample rule data shipped with the integration tests
    // ---------------------------------------------------------------------
    let rules = RuleData::from_json_str(include_str!("../tests/data/zhcdict.json"))?;
    let converter = ZhConverter::new(rules);

    let input_text = "秦川雄帝宅，函谷壯皇居。綺殿千尋起，離宮百雉餘。連甍遙接漢，飛觀迥凌虛。雲日隱層闕，風煙出綺疎。";

    println!("Text:");
    println!("{}", input_text);
    println!("Script: {:?}", converter.detect_script(input_text)?);
    println!();

    // ---------------------------------------------------------------------
    // Convert to every supported locale
    // ---------------------------------------------------------------------
    for locale in Locale::ALL {
        let output = converter.convert_to(input_text, locale)?;
        println!("== {} [{}] ==", locale, locale.resolve_chain().join(", "));
        println!("{}", output);
    }

    // Unsupported tags pass the text through unchanged.
    println!();
    println!("== en ==");
    println!("{}", converter.convert(input_text, "en")?);

    Ok(())
}
