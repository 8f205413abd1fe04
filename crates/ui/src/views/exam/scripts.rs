/// Ticks the `#exam-timer` label once per second while the exam runs.
pub(super) fn exam_timer_script(started_at_ms: i64, running: bool) -> String {
    format!(
        r#"(function() {{
                    const state = window.__tutorExamTimer || (window.__tutorExamTimer = {{ id: null }});
                    const startedAt = {started_at_ms};
                    const running = {running};
                    const render = () => {{
                        const label = document.getElementById("exam-timer");
                        if (!label) {{
                            return false;
                        }}
                        const total = Math.max(0, Math.floor((Date.now() - startedAt) / 1000));
                        const minutes = Math.floor(total / 60);
                        const seconds = String(total % 60).padStart(2, "0");
                        label.textContent = minutes + ":" + seconds;
                        return true;
                    }};
                    if (state.id) {{
                        clearInterval(state.id);
                        state.id = null;
                    }}
                    if (!running) {{
                        return;
                    }}
                    render();
                    state.id = setInterval(() => {{
                        if (!render()) {{
                            clearInterval(state.id);
                            state.id = null;
                        }}
                    }}, 1000);
                }})();"#,
    )
}
