use log::debug;

use crate::models::TitleValues;
use crate::utils::TITLE_REGEX;

/// 提取标题页
///
/// 只有第一行是 `键: 值` 形式、且在第一个空行之前只出现键值行或缩进的延续行时，
/// 才认为存在标题页。返回标题页键值和正文开始的行号；没有标题页时返回空表和 0。
pub fn extract_title_page(lines: &[&str]) -> (TitleValues, usize) {
    let key_re = &TITLE_REGEX["key_value"];
    let continuation_re = &TITLE_REGEX["continuation"];

    let first = match lines.first() {
        Some(line) => *line,
        None => return (TitleValues::new(), 0),
    };
    if !key_re.is_match(first) {
        debug!("第一行不是标题页键值，跳过标题页");
        return (TitleValues::new(), 0);
    }

    let mut values = TitleValues::new();
    let mut current: Option<(String, String)> = None;
    let mut key_count = 0;
    let mut continued = false;
    let mut body_start = lines.len();

    for (i, line) in lines.iter().enumerate() {

        if line.trim().is_empty() {
            body_start = i + 1;
            break;
        }

        if let Some(caps) = key_re.captures(line) {
            commit(&mut values, current.take());
            current = Some((caps["key"].to_string(), caps["value"].trim_end().to_string()));
            key_count += 1;
        } else if continuation_re.is_match(line) {
            if let Some((_, value)) = current.as_mut() {
                let text = line.trim();
                if !value.is_empty() {
                    value.push('\n');
                }
                value.push_str(text);
                continued = true;
            }
        } else {
            debug!("标题页第 {} 行既不是键值也不是延续行，视为没有标题页", i + 1);
            return (TitleValues::new(), 0);
        }
    }

    // 只有一个空值的键（如 `FADE IN:`），不是标题页
    let lone_empty_key = key_count == 1
        && !continued
        && current.as_ref().map_or(false, |(_, v)| v.is_empty());
    if lone_empty_key {
        debug!("唯一的标题页键没有值，视为正文");
        return (TitleValues::new(), 0);
    }

    commit(&mut values, current);
    debug!("标题页共 {} 项，正文从第 {} 行开始", values.len(), body_start + 1);
    (values, body_start)
}

fn commit(values: &mut TitleValues, entry: Option<(String, String)>) {
    if let Some((key, value)) = entry {
        values.insert(key, value);
    }
}
