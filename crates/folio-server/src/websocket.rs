//! WebSocket-based live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages sent to preview clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HmrMessage {
    /// Full page reload
    Reload,

    /// Swap the theme without re-rendering the page
    UpdateTheme {
        /// Inline style with every theme variable
        style: String,
        /// Generated rule text
        rules: String,
    },

    /// Connection established
    Connected,
}

/// Hub for broadcasting messages to all connected preview clients.
#[derive(Debug, Clone)]
pub struct HmrHub {
    sender: broadcast::Sender<HmrMessage>,
}

impl HmrHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: HmrMessage) {
        // No receivers is fine.
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HmrMessage> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for HmrHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Client-side script for live reload and preview interactions.
///
/// Elements rendered with a `data-action` attribute are wired here: opening a
/// project navigates to `?project=N`, closing the overlay drops the query.
pub fn hmr_client_script(ws_path: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const scheme = location.protocol === 'https:' ? 'wss://' : 'ws://';
  const ws = new WebSocket(scheme + location.host + '{}');
  let reconnectAttempts = 0;
  const maxReconnectAttempts = 10;

  ws.onopen = function() {{
    console.log('[folio] Connected');
    reconnectAttempts = 0;
  }};

  ws.onmessage = function(event) {{
    const msg = JSON.parse(event.data);

    switch (msg.type) {{
      case 'reload':
        location.reload();
        break;

      case 'update_theme': {{
        const root = document.querySelector('.folio-root');
        const rules = document.getElementById('folio-rules');
        if (root && rules) {{
          root.setAttribute('style', msg.style);
          rules.textContent = msg.rules;
        }} else {{
          location.reload();
        }}
        break;
      }}

      case 'connected':
        break;
    }}
  }};

  ws.onclose = function() {{
    if (reconnectAttempts < maxReconnectAttempts) {{
      reconnectAttempts++;
      setTimeout(function() {{
        location.reload();
      }}, 1000 * reconnectAttempts);
    }}
  }};

  document.addEventListener('click', function(event) {{
    const target = event.target.closest('[data-action]');
    if (!target) return;

    const url = new URL(location.href);
    switch (target.dataset.action) {{
      case 'open-project':
        url.searchParams.set('project', target.dataset.project);
        break;
      case 'close-overlay':
        url.searchParams.delete('project');
        break;
      default:
        return;
    }}
    event.preventDefault();
    location.assign(url.toString());
  }});

  document.addEventListener('keydown', function(event) {{
    if (event.key === 'Escape' && document.querySelector('.project-overlay')) {{
      const url = new URL(location.href);
      url.searchParams.delete('project');
      location.assign(url.toString());
    }}
  }});
}})();
"#,
        ws_path
    )
}
