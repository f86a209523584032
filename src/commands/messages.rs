use super::QuickLinkExt;
use crate::messages::MessageQuery;
use crate::models::{Message, NewMessage};
use serde::Serialize;
use tauri::AppHandle;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbox {
    pub messages: Vec<Message>,
    pub unread: usize,
}

#[tauri::command]
pub fn get_messages(app: AppHandle, query: MessageQuery) -> Result<Inbox, String> {
    let ql = app.quicklink()?;
    ql.admin_view(|ql| Inbox {
        messages: ql.admin.messages.filter(&query),
        unread: ql.admin.messages.unread_count(),
    })
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn send_message(app: AppHandle, message: NewMessage) -> Result<Message, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.messages.send(message, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn reply_to_message(app: AppHandle, id: String, content: String) -> Result<Message, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.messages.reply(&id, &content, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn mark_message_read(app: AppHandle, id: String) -> Result<Message, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, _| admin.messages.mark_read(&id))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_message(app: AppHandle, id: String) -> Result<(), String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.messages.remove(&id, trail))
        .map(|_| ())
        .map_err(|e| e.to_string())
}
