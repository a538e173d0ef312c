#![allow(dead_code)]

pub mod temp_files {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Unique directory under the system temp dir
    pub fn temp_dir(prefix: &str) -> PathBuf {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "oas_mockgen_{prefix}_{}_{counter}_{nanos}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write `content` as `openapi.<ext>` inside a fresh temp directory
    pub fn create_temp_spec(content: &str, ext: &str) -> PathBuf {
        let path = temp_dir("spec").join(format!("openapi.{ext}"));
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn create_temp_yaml(content: &str) -> PathBuf {
        create_temp_spec(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> PathBuf {
        create_temp_spec(content, "json")
    }

    /// Remove the directory holding `path` (best effort)
    pub fn cleanup(path: &std::path::Path) {
        let dir = if path.is_dir() { Some(path) } else { path.parent() };
        if let Some(dir) = dir {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

pub mod fixtures {
    /// Small user/post API with a recursive schema, path-level parameters,
    /// a `default` response and an event stream.
    pub const USERS_YAML: &str = r#"openapi: 3.0.3
info:
  title: Users
  version: "1.0.0"
servers:
  - url: https://{region}.example.com/api/
    variables:
      region:
        default: eu
paths:
  /users:
    get:
      operationId: list_users
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/User'
        "500":
          description: boom
    post:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/CreateUser'
      responses:
        "201":
          description: created
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/User'
        "400":
          description: bad
  /users/{user_id}:
    parameters:
      - name: user_id
        in: path
        required: true
        schema:
          type: string
    get:
      operationId: getUser
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/User'
        "404":
          description: missing
        default:
          description: error
  /posts:
    get:
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Post'
  /internal/health:
    get:
      responses:
        "204":
          description: healthy
  /chat/stream:
    post:
      operationId: streamChat
      responses:
        "200":
          description: events
          content:
            text/event-stream:
              schema:
                type: string
components:
  schemas:
    User:
      title: User
      type: object
      properties:
        id:
          type: integer
          minimum: 1
        email:
          type: string
          format: email
        manager:
          $ref: '#/components/schemas/User'
    CreateUser:
      title: CreateUser
      type: object
      properties:
        email:
          type: string
    Post:
      title: Post
      type: object
      properties:
        title:
          type: string
        author:
          $ref: '#/components/schemas/User'
"#;

    /// One capture of a recorded request
    pub fn rest_capture(method: &str, url: &str, status: u16) -> serde_json::Value {
        serde_json::json!({
            "type": "http-rest",
            "requestId": format!("{method}-{url}-{status}"),
            "request": { "method": method, "url": url },
            "response": { "status": status, "body": { "status": status } }
        })
    }
}
