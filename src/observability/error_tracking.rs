use tracing::error;
use uuid::Uuid;

/// Logs a server-side failure under a fresh event id so it can be found from
/// the client's report. Returns `None` for anything below 500.
pub fn report_server_error(
    path: &str,
    method: &str,
    status: u16,
    request_id: &str,
) -> Option<Uuid> {
    if status < 500 {
        return None;
    }

    let event_id = Uuid::new_v4();
    error!(
        event_id = %event_id,
        request_id = %request_id,
        method = %method,
        path = %path,
        status = status,
        "unexpected server error"
    );
    Some(event_id)
}
