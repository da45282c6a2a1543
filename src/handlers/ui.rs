use axum::{response::Html, routing::get, Router};

pub fn ui_routes() -> Router {
    Router::new().route("/", get(index_page))
}

/// Single page with one form per tool. Results are shown as raw JSON.
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r###"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Tube Automation</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #0f0f1a;
            color: #e6e6f0;
            padding: 2rem;
        }
        h1 { margin-bottom: 0.5rem; }
        p.lead { color: #9a9ab0; margin-bottom: 2rem; }
        .grid {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(340px, 1fr));
            gap: 1.25rem;
        }
        form {
            background: #1a1a2e;
            border: 1px solid #2a2a44;
            border-radius: 10px;
            padding: 1.25rem;
            display: flex;
            flex-direction: column;
            gap: 0.6rem;
        }
        form h2 { font-size: 1.05rem; }
        label { font-size: 0.85rem; color: #9a9ab0; }
        input, textarea, select {
            width: 100%;
            padding: 0.5rem;
            border-radius: 6px;
            border: 1px solid #2a2a44;
            background: #0f0f1a;
            color: inherit;
        }
        textarea { min-height: 90px; resize: vertical; }
        button {
            padding: 0.6rem;
            border: none;
            border-radius: 6px;
            background: #e63946;
            color: white;
            font-weight: 600;
            cursor: pointer;
        }
        pre {
            white-space: pre-wrap;
            word-break: break-word;
            font-size: 0.8rem;
            background: #0f0f1a;
            padding: 0.5rem;
            border-radius: 6px;
            min-height: 2rem;
        }
    </style>
</head>
<body>
    <h1>Tube Automation</h1>
    <p class="lead">Metadata, thumbnails and uploads for your channel. <a href="/oauth/authorize" style="color:#e63946">Connect YouTube</a></p>

    <div class="grid">
        <form data-endpoint="/generate_title">
            <h2>Generate title</h2>
            <textarea name="content" placeholder="Video content or transcript"></textarea>
            <button type="submit">Generate</button>
            <pre></pre>
        </form>

        <form data-endpoint="/transcribe" enctype="multipart/form-data">
            <h2>Transcribe audio</h2>
            <input type="file" name="audio" accept="audio/*,video/*">
            <button type="submit">Transcribe</button>
            <pre></pre>
        </form>

        <form data-endpoint="/enhance_description">
            <h2>Enhance description</h2>
            <textarea name="content" placeholder="Description"></textarea>
            <button type="submit">Enhance</button>
            <pre></pre>
        </form>

        <form data-endpoint="/assign_playlist">
            <h2>Assign playlist</h2>
            <textarea name="transcription" placeholder="Transcription"></textarea>
            <button type="submit">Assign</button>
            <pre></pre>
        </form>

        <form data-endpoint="/generate_number">
            <h2>Hierarchical number</h2>
            <select name="video_type">
                <option value="main">Main</option>
                <option value="follow_up">Follow-up</option>
                <option value="clarification">Clarification</option>
            </select>
            <input name="parent_number" data-optional placeholder="Parent number (e.g. 123 or 123.01)">
            <button type="submit">Generate</button>
            <pre></pre>
        </form>

        <form data-endpoint="/generate_tags">
            <h2>Generate tags</h2>
            <textarea name="content" placeholder="Content"></textarea>
            <input name="max_tags" data-optional type="number" min="1" max="50" placeholder="Max tags (15)">
            <button type="submit">Generate</button>
            <pre></pre>
        </form>

        <form data-endpoint="/suggest_category">
            <h2>Suggest category</h2>
            <textarea name="content" placeholder="Content"></textarea>
            <button type="submit">Suggest</button>
            <pre></pre>
        </form>

        <form data-endpoint="/detect_language">
            <h2>Detect language</h2>
            <textarea name="text" placeholder="Text"></textarea>
            <button type="submit">Detect</button>
            <pre></pre>
        </form>

        <form data-endpoint="/analyze_content">
            <h2>Analyze content</h2>
            <textarea name="content" placeholder="Content"></textarea>
            <button type="submit">Analyze</button>
            <pre></pre>
        </form>

        <form data-endpoint="/analyze_tags_content">
            <h2>Analyze tags</h2>
            <textarea name="content" placeholder="Content"></textarea>
            <button type="submit">Analyze</button>
            <pre></pre>
        </form>

        <form data-endpoint="/analyze_playlist_content">
            <h2>Analyze playlist fit</h2>
            <textarea name="content" placeholder="Content or transcription"></textarea>
            <button type="submit">Analyze</button>
            <pre></pre>
        </form>

        <form data-endpoint="/generate_thumbnail_from_video" enctype="multipart/form-data">
            <h2>Thumbnail from video</h2>
            <input type="file" name="video" accept="video/*">
            <input name="timestamp" data-optional type="number" step="0.1" placeholder="Timestamp in seconds (1.0)">
            <button type="submit">Extract</button>
            <pre></pre>
        </form>

        <form data-endpoint="/generate_custom_thumbnail">
            <h2>Custom thumbnail</h2>
            <input name="text" placeholder="Thumbnail text">
            <label>Background <input name="background_color" value="#1a1a2e"></label>
            <label>Text colour <input name="text_color" value="white"></label>
            <button type="submit">Render</button>
            <pre></pre>
        </form>

        <form data-endpoint="/upload_video" enctype="multipart/form-data">
            <h2>Upload to YouTube</h2>
            <input type="file" name="video" accept="video/*">
            <input name="title" placeholder="Title" maxlength="100">
            <textarea name="description" placeholder="Description"></textarea>
            <input name="tags" placeholder="Tags, comma separated">
            <input name="category_id" placeholder="Category id (22)">
            <select name="privacy_status">
                <option value="private">Private</option>
                <option value="unlisted">Unlisted</option>
                <option value="public">Public</option>
            </select>
            <input name="playlist" placeholder="Playlist">
            <input name="hierarchical_number" placeholder="Hierarchical number">
            <input name="thumbnail_file" placeholder="Generated thumbnail file name">
            <button type="submit">Upload</button>
            <pre></pre>
        </form>
    </div>

    <script>
        document.querySelectorAll('form[data-endpoint]').forEach((form) => {
            form.addEventListener('submit', async (event) => {
                event.preventDefault();
                const out = form.querySelector('pre');
                out.textContent = 'Working...';
                const data = new FormData(form);
                // optional fields are left out when blank; required ones are always sent
                form.querySelectorAll('[data-optional]').forEach((input) => {
                    if (input.value === '') data.delete(input.name);
                });
                const body = form.enctype === 'multipart/form-data' ? data : new URLSearchParams(data);
                try {
                    const response = await fetch(form.dataset.endpoint, { method: 'POST', body });
                    const json = await response.json();
                    out.textContent = JSON.stringify(json, null, 2);
                } catch (err) {
                    out.textContent = 'Request failed: ' + err;
                }
            });
        });
    </script>
</body>
</html>
"###;
