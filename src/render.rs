//! Panel document — self-contained HTML for the chat panel.
//!
//! `render` is pure: the same turns always produce the same bytes. Stored
//! text is untrusted and goes through [`escape_html`]; the page script only
//! ever inserts live text with `textContent`.

use std::fmt::Write as _;

use crate::history::Turn;

pub const PANEL_TITLE: &str = "AI Assistant";

/// WebSocket path the page script connects to.
pub const SOCKET_PATH: &str = "/api/chat/ws";

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>AI Assistant</title>
<style>
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;margin:16px}
#chat{height:300px;overflow-y:auto;border:1px solid #ccc;padding:10px}
#chat p{margin:4px 0;white-space:pre-wrap;word-wrap:break-word}
#chat .pending{color:#888}
#chat .error{color:#c33}
#userQuery{width:100%;box-sizing:border-box;margin-top:8px}
</style>
</head>
<body>
<h3>AI Assistant</h3>
<div id="chat">"#;

const TAIL: &str = r#"</div>
<textarea id="userQuery" rows="3" placeholder="Type your question here..."></textarea><br>
<button id="send" type="button">Send</button>
<script>
(function () {
  const chat = document.getElementById("chat");
  const input = document.getElementById("userQuery");
  const pending = [];
  const proto = location.protocol === "https:" ? "wss:" : "ws:";
  const socket = new WebSocket(proto + "//" + location.host + "__SOCKET_PATH__");

  function line(label, text, cls) {
    const p = document.createElement("p");
    if (cls) p.className = cls;
    const b = document.createElement("b");
    b.textContent = label;
    p.appendChild(b);
    p.appendChild(document.createTextNode(" " + text));
    return p;
  }

  function scroll() {
    chat.scrollTop = chat.scrollHeight;
  }

  function send() {
    const text = input.value;
    if (!text.trim()) return;
    if (socket.readyState !== WebSocket.OPEN) {
      chat.appendChild(line("AI:", "Error: not connected", "error"));
      scroll();
      return;
    }
    const turn = document.createElement("div");
    turn.className = "turn";
    turn.appendChild(line("You:", text));
    const answer = line("AI:", "…", "pending");
    turn.appendChild(answer);
    chat.appendChild(turn);
    pending.push({ text: text, answer: answer });
    input.value = "";
    scroll();
    socket.send(JSON.stringify({ type: "submit_query", text: text }));
  }

  socket.addEventListener("message", function (event) {
    let msg;
    try { msg = JSON.parse(event.data); } catch (e) { return; }
    if (msg.type !== "show_result") return;
    const cls = msg.failed ? "error" : "";
    const filled = line("AI:", msg.ai_text, cls);
    const i = pending.findIndex(function (p) { return p.text === msg.user_text; });
    if (i >= 0) {
      const slot = pending.splice(i, 1)[0];
      slot.answer.replaceWith(filled);
    } else {
      const turn = document.createElement("div");
      turn.className = "turn";
      turn.appendChild(line("You:", msg.user_text));
      turn.appendChild(filled);
      chat.appendChild(turn);
    }
    scroll();
  });

  socket.addEventListener("close", function () {
    pending.splice(0).forEach(function (p) {
      p.answer.replaceWith(line("AI:", "Error: connection closed", "error"));
    });
  });

  document.getElementById("send").addEventListener("click", send);
  input.addEventListener("keydown", function (event) {
    if (event.key === "Enter" && !event.shiftKey) {
      event.preventDefault();
      send();
    }
  });
  scroll();
})();
</script>
</body>
</html>
"#;

/// Render the panel with `history` pre-populated.
#[must_use]
pub fn render(history: &[Turn]) -> String {
    let mut out = String::with_capacity(HEAD.len() + TAIL.len() + history.len() * 128);
    out.push_str(HEAD);
    for turn in history {
        render_turn(&mut out, turn);
    }
    out.push_str(&TAIL.replace("__SOCKET_PATH__", SOCKET_PATH));
    out
}

fn render_turn(out: &mut String, turn: &Turn) {
    // Writing to a String never fails.
    let _ = write!(
        out,
        "\n<div class=\"turn\"><p><b>You:</b> {}</p><p><b>AI:</b> {}</p></div>",
        escape_html(&turn.user_text),
        escape_html(&turn.ai_text),
    );
}

/// Escape text for use in element content or a quoted attribute.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
