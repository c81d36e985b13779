//! Company name normalization.

/// Strip corporate suffixes and ASCII parentheses from a company name.
///
/// Each suffix is removed everywhere it occurs, in list order, so a later
/// suffix only sees what earlier removals left behind. Full-width brackets
/// are kept. Apply once: the result is not guaranteed to be a fixed point.
pub fn format_company_name(name: &str, suffixes: &[String]) -> String {
    let mut name = name.to_string();
    for suffix in suffixes.iter().filter(|s| !s.is_empty()) {
        name = name.replace(suffix.as_str(), "");
    }
    name.replace(['(', ')'], "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixes(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_removes_suffixes_and_parens() {
        let list = suffixes(&["Technology", "Limited Liability Company"]);
        assert_eq!(
            format_company_name(
                "Company Alpha Technology(Shenzhen)Limited Liability Company",
                &list
            ),
            "Company Alpha Shenzhen"
        );

        let list = suffixes(&["Tech", "Limited Liability Company"]);
        assert_eq!(
            format_company_name("AlphaTech(Shenzhen)Limited Liability Company", &list),
            "AlphaShenzhen"
        );
    }

    #[test]
    fn test_removal_is_global_not_positional() {
        let list = suffixes(&["Group"]);
        assert_eq!(format_company_name("Group Alpha Group", &list), "Alpha");
    }

    #[test]
    fn test_list_order_matters() {
        // "有限公司" goes first, so the longer "股份有限公司" never matches whole.
        let list = suffixes(&["有限公司", "股份有限公司"]);
        assert_eq!(format_company_name("阿尔法股份有限公司", &list), "阿尔法股份");
    }

    #[test]
    fn test_full_width_brackets_survive() {
        let list = suffixes(&["科技", "有限公司"]);
        assert_eq!(
            format_company_name("阿尔法科技（深圳）有限公司", &list),
            "阿尔法（深圳）"
        );
        assert_eq!(
            format_company_name("阿尔法科技(深圳)有限公司", &list),
            "阿尔法深圳"
        );
    }

    #[test]
    fn test_deterministic() {
        let list = suffixes(&["集团", "控股"]);
        let a = format_company_name(" 北辰控股集团 ", &list);
        let b = format_company_name(" 北辰控股集团 ", &list);
        assert_eq!(a, b);
        assert_eq!(a, "北辰");
    }
}
