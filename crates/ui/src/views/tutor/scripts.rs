pub(super) const IMAGE_INPUT_ID: &str = "chat-image-input";

/// Reads the first picked image as `{ mime, data }` with base64 data, then
/// resets the input so the same file can be picked again.
pub(super) fn read_picked_image_script() -> String {
    format!(
        r#"const input = document.getElementById({id:?});
        const file = input && input.files && input.files[0];
        if (!file) {{
            return {{ mime: "", data: "" }};
        }}
        const data = await new Promise((resolve) => {{
            const reader = new FileReader();
            reader.onloadend = () => {{
                const text = String(reader.result || "");
                const comma = text.indexOf(",");
                resolve(comma >= 0 ? text.slice(comma + 1) : "");
            }};
            reader.readAsDataURL(file);
        }});
        input.value = "";
        return {{ mime: file.type || "", data }};"#,
        id = IMAGE_INPUT_ID,
    )
}

pub(super) fn open_image_picker_script() -> String {
    format!("document.getElementById({IMAGE_INPUT_ID:?})?.click();")
}

pub(super) const SCROLL_TO_BOTTOM_SCRIPT: &str = r#"
    const log = document.getElementById("chat-log");
    if (log) {
        log.scrollTop = log.scrollHeight;
    }
"#;
