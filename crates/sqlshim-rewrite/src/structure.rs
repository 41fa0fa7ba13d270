//! Statement structure lookups shared by the keyword-based rewrites

/// Parenthesis depth of every byte of `sql`, or `None` for bytes inside a
/// single-quoted literal (quotes and doubled-quote escapes included).
pub(crate) fn code_depths(sql: &str) -> Vec<Option<u32>> {
    let bytes = sql.as_bytes();
    let mut depths = Vec::with_capacity(bytes.len());
    let mut depth = 0u32;
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if in_string {
            depths.push(None);
            if byte == b'\'' {
                if bytes.get(i + 1) == Some(&b'\'') {
                    depths.push(None);
                    i += 1;
                } else {
                    in_string = false;
                }
            }
        } else {
            match byte {
                b'\'' => {
                    in_string = true;
                    depths.push(None);
                }
                b'(' => {
                    depths.push(Some(depth));
                    depth += 1;
                }
                b')' => {
                    depth = depth.saturating_sub(1);
                    depths.push(Some(depth));
                }
                _ => depths.push(Some(depth)),
            }
        }
        i += 1;
    }

    depths
}
