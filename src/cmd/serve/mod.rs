// Copyright 2026 The norsk-drill Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod admin;
mod api;
mod error;
mod grammar;
mod practice;
mod search;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::path::PathBuf;

    use norsk_drill_core::Category;
    use norsk_drill_core::QuestionId;
    use portpicker::pick_unused_port;
    use reqwest::StatusCode;
    use serde_json::Value;
    use serde_json::json;
    use tokio::spawn;

    use crate::cmd::serve::server::ServerConfig;
    use crate::cmd::serve::server::start_server;
    use crate::db::Database;
    use crate::error::Fallible;
    use crate::helper::create_sample_database;
    use crate::helper::create_tmp_directory;
    use crate::utils::wait_for_server;

    const TEST_HOST: &str = "127.0.0.1";

    fn test_config(database: PathBuf, port: u16) -> ServerConfig {
        ServerConfig {
            database,
            host: TEST_HOST.to_string(),
            port,
            window_size: 10,
            seed: Some(7),
            admin_localhost_only: true,
        }
    }

    /// Start a server on the sample database and return its base URL.
    async fn start_sample_server() -> Fallible<(String, PathBuf)> {
        let port = pick_unused_port().unwrap();
        let database = create_sample_database()?;
        let config = test_config(database.clone(), port);
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;
        Ok((format!("http://{TEST_HOST}:{port}"), database))
    }

    fn ids(database: &Path, category: Category) -> Fallible<Vec<QuestionId>> {
        let db = Database::new(database)?;
        Ok(db.words(category, None)?.iter().map(|w| w.id).collect())
    }

    async fn get_json(url: String) -> Fallible<(StatusCode, Value)> {
        let response = reqwest::get(url).await?;
        let status = response.status();
        let value: Value = serde_json::from_str(&response.text().await?)?;
        Ok((status, value))
    }

    async fn post_json(url: String, body: Value) -> Fallible<(StatusCode, Value)> {
        let response = reqwest::Client::new()
            .post(url)
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await?;
        let status = response.status();
        let value: Value = serde_json::from_str(&response.text().await?)?;
        Ok((status, value))
    }

    #[tokio::test]
    async fn test_start_server_with_unopenable_database() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let dir = create_tmp_directory()?;
        let database = dir.join("no-such-directory").join("words.db");
        let result = start_server(test_config(database, port)).await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_static_and_fallback() -> Fallible<()> {
        let (base, _) = start_sample_server().await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("{base}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the not found endpoint.
        let response = reqwest::get(format!("{base}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Unknown category.
        let response = reqwest::get(format!("{base}/practice/pronouns")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the menu.
        let response = reqwest::get(format!("{base}/")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await?;
        assert!(html.contains("Nouns"));
        assert!(html.contains("(3)"));
        Ok(())
    }

    #[tokio::test]
    async fn test_random_skips_recent() -> Fallible<()> {
        let (base, database) = start_sample_server().await?;
        let nouns = ids(&database, Category::Noun)?;
        let (a, b, c) = (nouns[0], nouns[1], nouns[2]);
        for _ in 0..5 {
            let (status, body) =
                get_json(format!("{base}/api/nouns/random?recent={a}%2C{b}")).await?;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["question"]["id"], json!(c));
            assert_eq!(body["recent"], json!([b, c]));
            // Answers are not sent to the client.
            assert!(body["question"].get("accepted").is_none());
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_random_single_item_falls_back() -> Fallible<()> {
        let (base, database) = start_sample_server().await?;
        let adjectives = ids(&database, Category::Adjective)?;
        let only = adjectives[0];
        let (status, body) = get_json(format!("{base}/api/adjectives/random?recent={only}")).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"]["id"], json!(only));
        assert_eq!(body["recent"], json!([only]));
        Ok(())
    }

    #[tokio::test]
    async fn test_random_empty_category() -> Fallible<()> {
        let (base, _) = start_sample_server().await?;
        let (status, body) = get_json(format!("{base}/api/phrases/random")).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "no words available in phrases");

        // A tag nothing carries empties the pool too.
        let (status, _) = get_json(format!("{base}/api/nouns/random?tag=nonexistent")).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_check_endpoint() -> Fallible<()> {
        let (base, database) = start_sample_server().await?;
        let verbs = ids(&database, Category::Verb)?;
        let gaa = verbs[0];

        // Blank translation is incorrect, even when the forms are right.
        let (status, body) = post_json(
            format!("{base}/api/verbs/{gaa}/check"),
            json!({ "translation": "  ", "forms": { "presens": "går", "preteritum": "gikk", "perfect": "har gått" } }),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translation"]["verdict"]["correct"], false);
        assert_eq!(body["forms"][0]["verdict"]["correct"], true);
        assert_eq!(body["all_correct"], false);

        // Parenthetical and case are ignored.
        let (status, body) = post_json(
            format!("{base}/api/verbs/{gaa}/check"),
            json!({ "translation": "To Go", "forms": { "presens": "går", "preteritum": "gikk", "perfect": "har gått" } }),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translation"]["verdict"]["matched"], "to go (on foot)");
        assert_eq!(body["all_correct"], true);

        // Wrong category for the id.
        let (status, _) = post_json(
            format!("{base}/api/nouns/{gaa}/check"),
            json!({ "translation": "to go" }),
        )
        .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Missing word.
        let (status, body) = post_json(
            format!("{base}/api/verbs/999999/check"),
            json!({ "translation": "to go" }),
        )
        .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "no verbs with id 999999");
        Ok(())
    }

    #[tokio::test]
    async fn test_search() -> Fallible<()> {
        let (base, _) = start_sample_server().await?;
        let (status, body) = get_json(format!("{base}/api/search?q=car")).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "car");
        assert_eq!(body["results"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["results"][0]["lemma"], "bil");

        let (status, _) = get_json(format!("{base}/api/search?q=%20")).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let response = reqwest::get(format!("{base}/search?q=huset")).await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("et hus"));
        Ok(())
    }

    #[tokio::test]
    async fn test_practice_round_trip() -> Fallible<()> {
        let (base, database) = start_sample_server().await?;
        let verbs = ids(&database, Category::Verb)?;
        let gaa = verbs[0];

        let response = reqwest::get(format!("{base}/practice/verbs")).await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("name=\"translation\""));
        assert!(html.contains("name=\"recent\""));

        let id = gaa.to_string();
        let response = reqwest::Client::new()
            .post(format!("{base}/practice/verbs"))
            .form(&[
                ("id", id.as_str()),
                ("recent", id.as_str()),
                ("tag", ""),
                ("translation", "to walk"),
                ("form_presens", "går"),
                ("form_preteritum", "gikk"),
                ("form_perfect", "har gått"),
            ])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Correct!"));
        assert!(html.contains(&format!("/practice/verbs?recent={gaa}")));

        let response = reqwest::Client::new()
            .post(format!("{base}/practice/verbs"))
            .form(&[("id", id.as_str()), ("translation", "")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Not quite."));
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_import_and_lessons() -> Fallible<()> {
        let (base, database) = start_sample_server().await?;
        assert_eq!(Database::new(&database)?.count(Category::Phrase)?, 0);

        let response = reqwest::Client::new()
            .post(format!("{base}/admin/phrases/import-text"))
            .form(&[("data", "Hei – hello, hi\nTakk - thanks\nbroken line\n")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Added 2, skipped 0 duplicates, rejected 1 lines."));
        assert_eq!(Database::new(&database)?.count(Category::Phrase)?, 2);

        let response = reqwest::Client::new()
            .post(format!("{base}/admin/nouns/import-csv"))
            .form(&[("data", "article,word,translations\nei,bok,book\net,hus,house\n")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Added 1, skipped 1 duplicates"));
        assert_eq!(Database::new(&database)?.count(Category::Noun)?, 4);

        // The new phrases can be practised.
        let (status, _) = get_json(format!("{base}/api/phrases/random")).await?;
        assert_eq!(status, StatusCode::OK);

        let response = reqwest::Client::new()
            .post(format!("{base}/admin/grammar/add"))
            .form(&[
                ("title", "Word order"),
                ("content", "The verb comes *second*."),
                ("tags", "syntax"),
                ("level", "A2"),
            ])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = reqwest::get(format!("{base}/grammar")).await?.text().await?;
        assert!(html.contains("Word order"));
        assert!(html.contains("<em>second</em>"));
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_edit_and_delete() -> Fallible<()> {
        let (base, database) = start_sample_server().await?;
        let adjectives = ids(&database, Category::Adjective)?;
        let stor = adjectives[0];

        let response = reqwest::get(format!("{base}/admin/adjectives/{stor}/edit")).await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("value=\"stort\""));

        let response = reqwest::Client::new()
            .post(format!("{base}/admin/adjectives/{stor}/edit"))
            .form(&[
                ("lemma", "stor"),
                ("translations", "big, great"),
                ("form_neuter", "stort"),
                ("form_plural", "store"),
                ("form_comparative", "større"),
            ])
            .send()
            .await?;
        assert!(response.status().is_success());
        let word = Database::new(&database)?.get_word(stor)?.unwrap();
        assert_eq!(word.translations, vec!["big".to_string(), "great".to_string()]);
        assert_eq!(word.forms.len(), 3);

        let response = reqwest::Client::new()
            .post(format!("{base}/admin/adjectives/{stor}/delete"))
            .send()
            .await?;
        assert!(response.status().is_success());
        assert_eq!(Database::new(&database)?.get_word(stor)?, None);

        let response = reqwest::Client::new()
            .post(format!("{base}/admin/adjectives/{stor}/delete"))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }
}
