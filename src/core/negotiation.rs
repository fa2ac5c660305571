// Response format selection from `Accept` quality values.

pub const APPLICATION_XML: &str = "application/xml";
pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Xml,
    Json,
}

impl ResponseFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ResponseFormat::Xml => APPLICATION_XML,
            ResponseFormat::Json => APPLICATION_JSON,
        }
    }
}

/// JSON only wins with a strictly higher quality; ties go to XML.
pub fn select_format(json_quality: f32, xml_quality: f32) -> ResponseFormat {
    if json_quality > xml_quality {
        ResponseFormat::Json
    } else {
        ResponseFormat::Xml
    }
}

#[derive(Debug, Clone, PartialEq)]
struct MediaRange {
    main_type: String,
    sub_type: String,
    quality: f32,
}

impl MediaRange {
    fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(';');
        let (main_type, sub_type) = parts.next()?.trim().split_once('/')?;
        let main_type = main_type.trim().to_ascii_lowercase();
        let sub_type = sub_type.trim().to_ascii_lowercase();
        if main_type.is_empty() || sub_type.is_empty() {
            return None;
        }

        let mut quality = 1.0;
        for param in parts {
            if let Some((name, value)) = param.split_once('=') {
                if name.trim().eq_ignore_ascii_case("q") {
                    quality = value.trim().parse::<f32>().unwrap_or(1.0).clamp(0.0, 1.0);
                }
            }
        }

        Some(Self {
            main_type,
            sub_type,
            quality,
        })
    }

    /// 0 = no match, 1 = `*/*`, 2 = `type/*`, 3 = exact.
    fn specificity(&self, main_type: &str, sub_type: &str) -> u8 {
        match (self.main_type.as_str(), self.sub_type.as_str()) {
            ("*", "*") => 1,
            (m, "*") if m == main_type => 2,
            (m, s) if m == main_type && s == sub_type => 3,
            _ => 0,
        }
    }
}

/// Parsed `Accept` header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptList {
    ranges: Vec<MediaRange>,
}

impl AcceptList {
    pub fn parse(header: Option<&str>) -> Self {
        let ranges = header
            .unwrap_or_default()
            .split(',')
            .filter_map(MediaRange::parse)
            .collect();
        Self { ranges }
    }

    /// Quality of the most specific matching range. An empty list accepts everything.
    pub fn quality_of(&self, mime_type: &str) -> f32 {
        if self.ranges.is_empty() {
            return 1.0;
        }
        let Some((main_type, sub_type)) = mime_type.split_once('/') else {
            return 0.0;
        };

        self.ranges
            .iter()
            .map(|range| (range.specificity(main_type, sub_type), range.quality))
            .filter(|(specificity, _)| *specificity > 0)
            .max_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)))
            .map(|(_, quality)| quality)
            .unwrap_or(0.0)
    }

    pub fn preferred_format(&self) -> ResponseFormat {
        select_format(
            self.quality_of(APPLICATION_JSON),
            self.quality_of(APPLICATION_XML),
        )
    }
}

pub fn negotiate(accept_header: Option<&str>) -> ResponseFormat {
    AcceptList::parse(accept_header).preferred_format()
}
